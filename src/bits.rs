use crate::constants::SENTINEL;
use crate::error::{Result, StegoError};

/// 有序的位序列。由字节生成时，每个字节按最高位优先展开。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<bool>,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
            .collect();
        Self { bits }
    }

    /// 将位序列还原为字节，同样按最高位优先。
    ///
    /// # Errors
    ///
    /// * 位数不是 8 的整数倍时返回 `CorruptPayload`。
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.bits.len() % 8 != 0 {
            return Err(StegoError::CorruptPayload(format!(
                "{} bits do not form whole bytes",
                self.bits.len()
            )));
        }

        Ok(self
            .bits
            .chunks_exact(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
            .collect())
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn push_sentinel(&mut self) {
        self.bits.extend_from_slice(&SENTINEL);
    }

    /// 末尾 16 位是否恰好等于终止符。
    pub fn ends_with_sentinel(&self) -> bool {
        self.bits.ends_with(&SENTINEL)
    }

    /// 去掉末尾的终止符 (若存在)。
    pub fn strip_sentinel(&mut self) -> bool {
        if self.ends_with_sentinel() {
            self.bits.truncate(self.bits.len() - SENTINEL.len());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

impl FromIterator<bool> for BitStream {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}
