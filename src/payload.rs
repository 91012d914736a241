//! # 负载编解码模块
//!
//! 文本负载：UTF-8 文本 → PKCS#7 填充 → AES-128-ECB 加密 → base64 → 位流 + 终止符。
//! 图像负载：已编码的图像字节 (如 PNG) → base64 → 位流 + 终止符，**不加密**。
//!
//! 两条路径都没有长度前缀，终止符是唯一的分隔手段。ECB 模式与图像路径不加密
//! 是既有的负载格式，改动它们会破坏与已有隐写图像的互通。

use crate::bits::BitStream;
use crate::constants::KEY_LEN;
use crate::error::{Result, StegoError};
use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

type Aes128EcbEnc = ecb::Encryptor<Aes128>;
type Aes128EcbDec = ecb::Decryptor<Aes128>;

const BLOCK_SIZE: usize = 16;

/// 加密文本并编码为带终止符的位流。
///
/// 调用方负责在嵌入前用 `capacity::ensure_fits` 检查容量。
///
/// # Errors
///
/// * `key` 不是 16 字节时返回 `InvalidKeyLength`。
pub fn encode_text(plaintext: &str, key: &[u8]) -> Result<BitStream> {
    let ciphertext = encrypt(plaintext.as_bytes(), key)?;
    Ok(frame(&ciphertext))
}

/// 将提取出的位流 (终止符已去除) 还原为明文。
///
/// # Errors
///
/// * `key` 不是 16 字节时返回 `InvalidKeyLength`。
/// * 位流不能组成 ASCII 的 base64 文本时返回 `CorruptPayload`。
/// * 填充无效或明文不是 UTF-8 时返回 `DecryptionFailed`。
pub fn decode_text(bits: &BitStream, key: &[u8]) -> Result<String> {
    ensure_key(key)?;
    let ciphertext = unframe(bits)?;
    let plaintext = decrypt(&ciphertext, key)?;
    String::from_utf8(plaintext).map_err(|e| StegoError::DecryptionFailed(e.to_string()))
}

/// 将已编码的图像字节转为带终止符的位流。
pub fn encode_image(bytes: &[u8]) -> BitStream {
    frame(bytes)
}

/// 将提取出的位流 (终止符已去除) 还原为图像字节。
pub fn decode_image(bits: &BitStream) -> Result<Vec<u8>> {
    unframe(bits)
}

fn frame(bytes: &[u8]) -> BitStream {
    let encoded = STANDARD.encode(bytes);
    let mut stream = BitStream::from_bytes(encoded.as_bytes());
    stream.push_sentinel();
    stream
}

fn unframe(bits: &BitStream) -> Result<Vec<u8>> {
    let ascii = bits.to_bytes()?;
    if !ascii.is_ascii() {
        return Err(StegoError::CorruptPayload("hidden data is not ASCII text".into()));
    }
    STANDARD
        .decode(&ascii)
        .map_err(|e| StegoError::CorruptPayload(e.to_string()))
}

fn ensure_key(key: &[u8]) -> Result<()> {
    if key.len() != KEY_LEN {
        return Err(StegoError::InvalidKeyLength(key.len()));
    }
    Ok(())
}

pub(crate) fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_key(key)?;
    let cipher =
        Aes128EcbEnc::new_from_slice(key).map_err(|_| StegoError::InvalidKeyLength(key.len()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

pub(crate) fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    ensure_key(key)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(StegoError::DecryptionFailed(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }
    let cipher =
        Aes128EcbDec::new_from_slice(key).map_err(|_| StegoError::InvalidKeyLength(key.len()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| StegoError::DecryptionFailed("invalid PKCS#7 padding".into()))
}
