use super::error::TrainingError;

/// Symbol to index map over a small fixed alphabet.
///
/// The map is precomputed into a byte-indexed table so emission lookups
/// never go through a hash map.
pub struct Alphabet {
    index: [i16; 256],
    symbols: Vec<u8>,
}

impl Alphabet {
    pub fn from_symbols(symbols: &str) -> Self {
        let mut index = [-1i16; 256];
        let bytes: Vec<u8> = symbols.bytes().collect();
        for (i, &s) in bytes.iter().enumerate() {
            index[s as usize] = i as i16;
        }
        Self { index, symbols: bytes }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        let i = self.index[symbol as usize];
        if i < 0 {
            None
        } else {
            Some(i as usize)
        }
    }

    /// Encode a raw sequence into symbol indices, rejecting any byte that is
    /// not part of the alphabet.
    pub fn encode(&self, raw: &str) -> Result<Vec<usize>, TrainingError> {
        let mut encoded = Vec::with_capacity(raw.len());
        for (position, symbol) in raw.bytes().enumerate() {
            match self.index_of(symbol) {
                Some(i) => encoded.push(i),
                None => {
                    return Err(TrainingError::UnknownSymbol {
                        symbol: symbol as char,
                        position,
                    })
                }
            }
        }
        Ok(encoded)
    }
}
