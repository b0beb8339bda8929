//! SHA-1 digest implementation (RFC 3174).
//!
//! Object identifiers are the SHA-1 of the full envelope bytes, so this
//! digest must match git's bit for bit. Implemented in-tree to keep the
//! crate dependency-light; verified against the RFC test vectors below.

/// SHA-1 digest size in bytes.
pub const SHA1_SIZE: usize = 20;

/// SHA-1 round constants.
const K: [u32; 4] = [0x5A82_7999, 0x6ED9_EBA1, 0x8F1B_BCDC, 0xCA62_C1D6];

/// A streaming SHA-1 hasher.
pub struct Sha1 {
    h: [u32; 5],
    block: [u8; 64],
    block_len: usize,
    message_len: u64,
}

impl Sha1 {
    /// Creates a hasher in its initial state.
    pub fn new() -> Self {
        Sha1 {
            h: [
                0x6745_2301,
                0xEFCD_AB89,
                0x98BA_DCFE,
                0x1032_5476,
                0xC3D2_E1F0,
            ],
            block: [0u8; 64],
            block_len: 0,
            message_len: 0,
        }
    }

    /// Feeds input bytes into the hasher.
    pub fn update(&mut self, mut data: &[u8]) {
        self.message_len = self.message_len.wrapping_add(data.len() as u64);

        // Top up a partially filled block first. If the input does not
        // fill it, the buffered bytes must stay put for the next call.
        if self.block_len > 0 {
            let take = (64 - self.block_len).min(data.len());
            self.block[self.block_len..self.block_len + take].copy_from_slice(&data[..take]);
            self.block_len += take;
            data = &data[take..];

            if self.block_len < 64 {
                return;
            }
            let block = self.block;
            self.compress(&block);
            self.block_len = 0;
        }

        let mut chunks = data.chunks_exact(64);
        for chunk in &mut chunks {
            let block: [u8; 64] = chunk.try_into().unwrap();
            self.compress(&block);
        }

        let rest = chunks.remainder();
        self.block[..rest.len()].copy_from_slice(rest);
        self.block_len = rest.len();
    }

    /// Consumes the hasher and returns the 20-byte digest.
    pub fn finalize(mut self) -> [u8; SHA1_SIZE] {
        let bit_len = self.message_len * 8;

        // One 0x80 byte, zeros up to a 56 (mod 64) boundary, then the
        // message length in bits as a big-endian u64.
        let pad_zeros = (55usize.wrapping_sub(self.message_len as usize)) % 64;
        let mut tail = Vec::with_capacity(1 + pad_zeros + 8);
        tail.push(0x80);
        tail.extend(std::iter::repeat(0u8).take(pad_zeros));
        tail.extend_from_slice(&bit_len.to_be_bytes());
        self.update(&tail);

        debug_assert_eq!(self.block_len, 0);

        let mut digest = [0u8; SHA1_SIZE];
        for (chunk, word) in digest.chunks_exact_mut(4).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        digest
    }

    /// Runs the compression function over one 64-byte block.
    fn compress(&mut self, block: &[u8; 64]) {
        let mut w = [0u32; 80];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            w[i] = u32::from_be_bytes(chunk.try_into().unwrap());
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }

        let [mut a, mut b, mut c, mut d, mut e] = self.h;

        for (i, &wi) in w.iter().enumerate() {
            let (f, k) = match i / 20 {
                0 => ((b & c) | (!b & d), K[0]),
                1 => (b ^ c ^ d, K[1]),
                2 => ((b & c) | (b & d) | (c & d), K[2]),
                _ => (b ^ c ^ d, K[3]),
            };

            let t = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(wi);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = t;
        }

        self.h[0] = self.h[0].wrapping_add(a);
        self.h[1] = self.h[1].wrapping_add(b);
        self.h[2] = self.h[2].wrapping_add(c);
        self.h[3] = self.h[3].wrapping_add(d);
        self.h[4] = self.h[4].wrapping_add(e);
    }
}

impl Default for Sha1 {
    fn default() -> Self {
        Sha1::new()
    }
}

/// Computes the SHA-1 digest of `data` in one call.
pub fn sha1(data: &[u8]) -> [u8; SHA1_SIZE] {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    // H-001: Empty input (RFC 3174 / git's null digest)
    #[test]
    fn test_sha1_empty() {
        let hash = sha1(b"");
        assert_eq!(to_hex(&hash), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    // H-002: Standard "abc" vector from RFC 3174
    #[test]
    fn test_sha1_abc() {
        let hash = sha1(b"abc");
        assert_eq!(to_hex(&hash), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    // H-003: 448-bit vector from RFC 3174
    #[test]
    fn test_sha1_448_bits() {
        let hash = sha1(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq");
        assert_eq!(to_hex(&hash), "84983e441c3bd26ebaae4aa1f95129e5e54670f1");
    }

    // H-004: Common known digest
    #[test]
    fn test_sha1_hello_world() {
        let hash = sha1(b"hello world");
        assert_eq!(to_hex(&hash), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    // H-005: Binary input
    #[test]
    fn test_sha1_binary() {
        let data: Vec<u8> = (0u8..=255).collect();
        let hash = sha1(&data);
        assert_eq!(to_hex(&hash), "4916d6bdb7f78e6803698cab32d1586ea457dfc8");
    }

    // H-006: Large input crossing many blocks
    #[test]
    fn test_sha1_large() {
        let data = vec![b'a'; 1024 * 1024];
        let hash = sha1(&data);
        assert_eq!(to_hex(&hash), "454027d64e3b855735552d42230eea1cbd645fa0");
    }

    // H-007: Incremental updates match a single call
    #[test]
    fn test_sha1_incremental() {
        let data = b"hello world this is a test of incremental hashing";

        let whole = sha1(data);

        let mut hasher = Sha1::new();
        hasher.update(b"hello ");
        hasher.update(b"world ");
        hasher.update(b"this is a test of incremental hashing");
        assert_eq!(whole, hasher.finalize());
    }

    // H-008: Inputs straddling the 55/56-byte padding boundary
    #[test]
    fn test_sha1_padding_boundaries() {
        for len in 54..=66 {
            let data = vec![b'x'; len];
            let whole = sha1(&data);

            let mut hasher = Sha1::new();
            for byte in &data {
                hasher.update(std::slice::from_ref(byte));
            }
            assert_eq!(whole, hasher.finalize(), "length {}", len);
        }
    }

    // H-009: Small updates that never fill a block are not dropped
    #[test]
    fn test_sha1_short_updates_buffered() {
        let mut hasher = Sha1::new();
        hasher.update(b"ab");
        hasher.update(b"c");
        assert_eq!(
            to_hex(&hasher.finalize()),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );

        // A second short call after a partial top-up must keep both.
        let mut hasher = Sha1::new();
        hasher.update(b"hello ");
        hasher.update(b"wor");
        hasher.update(b"ld");
        assert_eq!(
            to_hex(&hasher.finalize()),
            "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed"
        );
    }
}
