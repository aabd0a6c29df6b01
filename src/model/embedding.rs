use rig::embeddings::Embedding;

/// Conversions between [`Embedding`] vectors and the f32 little-endian blob
/// layout the vector index stores.
pub trait EmbeddingConversion {
    /// The embedding as f32 components
    fn to_vec(&self) -> Vec<f32>;
    /// Build an embedding from f32 components, with an empty document
    fn from_vec(vec: Vec<f32>) -> Self;
    /// The embedding as a little-endian f32 byte blob
    fn to_binary(&self) -> Vec<u8>;
    /// Build an embedding from a little-endian f32 byte blob
    fn from_binary(binary: &[u8]) -> Self;
}

impl EmbeddingConversion for Embedding {
    fn to_vec(&self) -> Vec<f32> {
        self.vec.iter().map(|f| *f as f32).collect()
    }

    fn from_vec(vec: Vec<f32>) -> Self {
        Self {
            vec: vec.into_iter().map(|f| f as f64).collect(),
            document: "".to_string(),
        }
    }

    fn to_binary(&self) -> Vec<u8> {
        self.vec
            .iter()
            .flat_map(|f| (*f as f32).to_le_bytes())
            .collect()
    }

    fn from_binary(binary: &[u8]) -> Self {
        let mut vec = Vec::with_capacity(binary.len() / 4);
        for chunk in binary.chunks_exact(4) {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            vec.push(f32::from_le_bytes(bytes));
        }
        Self::from_vec(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_round_trip() {
        let components = vec![0.5, -1.25, 3.0];
        let embedding = Embedding::from_vec(components.clone());
        assert_eq!(embedding.to_vec(), components);
    }

    #[test]
    fn test_binary_layout_is_little_endian_f32() {
        let embedding = Embedding::from_vec(vec![1.0]);
        assert_eq!(embedding.to_binary(), 1.0f32.to_le_bytes().to_vec());
    }

    #[test]
    fn test_binary_round_trip() {
        let embedding = Embedding::from_vec(vec![0.25, -0.75, 2.5, 4.0]);
        let recovered = Embedding::from_binary(&embedding.to_binary());
        assert_eq!(recovered.to_vec(), embedding.to_vec());
    }
}
