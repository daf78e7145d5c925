#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Built-in known-answer corpora.
//!
//! NIST SP 800-38A appendix F vectors (AES-128 and AES-256, four blocks per
//! record) for all five modes, plus AESAVS GFSbox, VarTxt and VarKey samples.
//! They are stored as `.rsp` text so every built-in run also goes through the
//! corpus parser.

use super::ParsedCorpus;
use super::parser::CorpusParser;
use blockcheck_primitives::Mode;

/// A corpus compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedCorpus {
    pub name: &'static str,
    pub mode: Mode,
    pub text: &'static str,
}

impl EmbeddedCorpus {
    #[must_use]
    pub fn parse(&self) -> ParsedCorpus {
        CorpusParser::parse_str(self.text)
    }
}

pub const SP800_38A_ECB: EmbeddedCorpus = EmbeddedCorpus {
    name: "SP800-38A-ECB",
    mode: Mode::Ecb,
    text: "\
# NIST SP 800-38A ECB-AES
[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf43b1cd7f598ece23881b00e3ed0306887b0c785e27e8ad3f8223207104725dd4

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870b6ed21b99ca6f4f9f153e7b1beafed1d23304b7a39f9f3ff067d8d8f9e24ecc7

[DECRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
CIPHERTEXT = 3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf43b1cd7f598ece23881b00e3ed0306887b0c785e27e8ad3f8223207104725dd4
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
CIPHERTEXT = f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870b6ed21b99ca6f4f9f153e7b1beafed1d23304b7a39f9f3ff067d8d8f9e24ecc7
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
",
};

pub const SP800_38A_CBC: EmbeddedCorpus = EmbeddedCorpus {
    name: "SP800-38A-CBC",
    mode: Mode::Cbc,
    text: "\
# NIST SP 800-38A CBC-AES
[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b273bed6b8e3c1743b7116e69e222295163ff1caa1681fac09120eca307586e1a7

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d39f23369a9d9bacfa530e26304231461b2eb05e2c39be9fcda6c19078c6a9d1b

[DECRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = 7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b273bed6b8e3c1743b7116e69e222295163ff1caa1681fac09120eca307586e1a7
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d39f23369a9d9bacfa530e26304231461b2eb05e2c39be9fcda6c19078c6a9d1b
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
",
};

pub const SP800_38A_CFB128: EmbeddedCorpus = EmbeddedCorpus {
    name: "SP800-38A-CFB128",
    mode: Mode::Cfb,
    text: "\
# NIST SP 800-38A CFB128-AES
[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b26751f67a3cbb140b1808cf187a4f4dfc04b05357c5d1c0eeac4c66f9ff7f2e6

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = dc7e84bfda79164b7ecd8486985d386039ffed143b28b1c832113c6331e5407bdf10132415e54b92a13ed0a8267ae2f975a385741ab9cef82031623d55b1e471

[DECRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = 3b3fd92eb72dad20333449f8e83cfb4ac8a64537a0b3a93fcde3cdad9f1ce58b26751f67a3cbb140b1808cf187a4f4dfc04b05357c5d1c0eeac4c66f9ff7f2e6
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = dc7e84bfda79164b7ecd8486985d386039ffed143b28b1c832113c6331e5407bdf10132415e54b92a13ed0a8267ae2f975a385741ab9cef82031623d55b1e471
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
",
};

pub const SP800_38A_OFB: EmbeddedCorpus = EmbeddedCorpus {
    name: "SP800-38A-OFB",
    mode: Mode::Ofb,
    text: "\
# NIST SP 800-38A OFB-AES
[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed8259740051e9c5fecf64344f7a82260edcc304c6528f659c77866a510d9c1d6ae5e

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = dc7e84bfda79164b7ecd8486985d38604febdc6740d20b3ac88f6ad82a4fb08d71ab47a086e86eedf39d1c5bba97c4080126141d67f37be8538f5a8be740e484

[DECRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = 3b3fd92eb72dad20333449f8e83cfb4a7789508d16918f03f53c52dac54ed8259740051e9c5fecf64344f7a82260edcc304c6528f659c77866a510d9c1d6ae5e
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = 000102030405060708090a0b0c0d0e0f
CIPHERTEXT = dc7e84bfda79164b7ecd8486985d38604febdc6740d20b3ac88f6ad82a4fb08d71ab47a086e86eedf39d1c5bba97c4080126141d67f37be8538f5a8be740e484
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
",
};

pub const SP800_38A_CTR: EmbeddedCorpus = EmbeddedCorpus {
    name: "SP800-38A-CTR",
    mode: Mode::Ctr,
    text: "\
# NIST SP 800-38A CTR-AES
[ENCRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff5ae4df3edbd5d35e5b4f09020db03eab1e031dda2fbe03d1792170a0f3009cee

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
CIPHERTEXT = 601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c52b0930daa23de94ce87017ba2d84988ddfc9c58db67aada613c2dd08457941a6

[DECRYPT]

COUNT = 0
KEY = 2b7e151628aed2a6abf7158809cf4f3c
IV = f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff
CIPHERTEXT = 874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff5ae4df3edbd5d35e5b4f09020db03eab1e031dda2fbe03d1792170a0f3009cee
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710

COUNT = 1
KEY = 603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4
IV = f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff
CIPHERTEXT = 601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c52b0930daa23de94ce87017ba2d84988ddfc9c58db67aada613c2dd08457941a6
PLAINTEXT = 6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710
",
};

pub const AESAVS_ECBGFSBOX128: EmbeddedCorpus = EmbeddedCorpus {
    name: "ECBGFSbox128",
    mode: Mode::Ecb,
    text: "\
# AESAVS ECBGFSbox128 sample
[ENCRYPT]

COUNT = 0
KEY = 00000000000000000000000000000000
PLAINTEXT = f34481ec3cc627bacd5dc3fb08f273e6
CIPHERTEXT = 0336763e966d92595a567cc9ce537f5e

COUNT = 1
KEY = 00000000000000000000000000000000
PLAINTEXT = 9798c4640bad75c7c3227db910174e72
CIPHERTEXT = a9a1631bf4996954ebc093957b234589

COUNT = 2
KEY = 00000000000000000000000000000000
PLAINTEXT = 96ab5c2ff612d9dfaae8c31f30c42168
CIPHERTEXT = ff4f8391a6a40ca5b25d23bedd44a597

[DECRYPT]

COUNT = 0
KEY = 00000000000000000000000000000000
CIPHERTEXT = 0336763e966d92595a567cc9ce537f5e
PLAINTEXT = f34481ec3cc627bacd5dc3fb08f273e6

COUNT = 1
KEY = 00000000000000000000000000000000
CIPHERTEXT = a9a1631bf4996954ebc093957b234589
PLAINTEXT = 9798c4640bad75c7c3227db910174e72

COUNT = 2
KEY = 00000000000000000000000000000000
CIPHERTEXT = ff4f8391a6a40ca5b25d23bedd44a597
PLAINTEXT = 96ab5c2ff612d9dfaae8c31f30c42168
",
};

pub const AESAVS_CBCVARTXT128: EmbeddedCorpus = EmbeddedCorpus {
    name: "CBCVarTxt128",
    mode: Mode::Cbc,
    text: "\
# AESAVS CBCVarTxt128 sample
[ENCRYPT]

COUNT = 0
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = 80000000000000000000000000000000
CIPHERTEXT = 3ad78e726c1ec02b7ebfe92b23d9ec34

COUNT = 1
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = c0000000000000000000000000000000
CIPHERTEXT = aae5939c8efdf2f04e60b9fe7117b2c2

COUNT = 2
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = e0000000000000000000000000000000
CIPHERTEXT = f031d4d74f5dcbf39daaf8ca3af6e527

[DECRYPT]

COUNT = 0
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = 3ad78e726c1ec02b7ebfe92b23d9ec34
PLAINTEXT = 80000000000000000000000000000000

COUNT = 1
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = aae5939c8efdf2f04e60b9fe7117b2c2
PLAINTEXT = c0000000000000000000000000000000

COUNT = 2
KEY = 00000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = f031d4d74f5dcbf39daaf8ca3af6e527
PLAINTEXT = e0000000000000000000000000000000
",
};

pub const AESAVS_OFBVARKEY128: EmbeddedCorpus = EmbeddedCorpus {
    name: "OFBVarKey128",
    mode: Mode::Ofb,
    text: "\
# AESAVS OFBVarKey128 sample
[ENCRYPT]

COUNT = 0
KEY = 80000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = 00000000000000000000000000000000
CIPHERTEXT = 0edd33d3c621e546455bd8ba1418bec8

COUNT = 1
KEY = c0000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = 00000000000000000000000000000000
CIPHERTEXT = 4bc3f883450c113c64ca42e1112a9e87

COUNT = 2
KEY = e0000000000000000000000000000000
IV = 00000000000000000000000000000000
PLAINTEXT = 00000000000000000000000000000000
CIPHERTEXT = 72a1da770f5d7ac4c9ef94d822affd97

[DECRYPT]

COUNT = 0
KEY = 80000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = 0edd33d3c621e546455bd8ba1418bec8
PLAINTEXT = 00000000000000000000000000000000

COUNT = 1
KEY = c0000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = 4bc3f883450c113c64ca42e1112a9e87
PLAINTEXT = 00000000000000000000000000000000

COUNT = 2
KEY = e0000000000000000000000000000000
IV = 00000000000000000000000000000000
CIPHERTEXT = 72a1da770f5d7ac4c9ef94d822affd97
PLAINTEXT = 00000000000000000000000000000000
",
};

/// Every embedded corpus, SP 800-38A first.
pub const ALL: &[EmbeddedCorpus] = &[
    SP800_38A_ECB,
    SP800_38A_CBC,
    SP800_38A_CFB128,
    SP800_38A_OFB,
    SP800_38A_CTR,
    AESAVS_ECBGFSBOX128,
    AESAVS_CBCVARTXT128,
    AESAVS_OFBVARKEY128,
];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use blockcheck_primitives::{Direction, expected_output, join_blocks};

    #[test]
    fn test_every_corpus_parses_cleanly() {
        for corpus in ALL {
            let parsed = corpus.parse();
            assert!(parsed.diagnostics.is_empty(), "{}: {:?}", corpus.name, parsed.diagnostics);
            let encrypt = parsed.cases_in(Direction::Encrypt).count();
            let decrypt = parsed.cases_in(Direction::Decrypt).count();
            assert!(encrypt > 0, "{}", corpus.name);
            assert_eq!(encrypt, decrypt, "{}", corpus.name);
        }
    }

    #[test]
    fn test_reference_model_agrees_with_every_record() {
        for corpus in ALL {
            for case in corpus.parse().cases {
                let prepared = case.to_session(corpus.mode).unwrap();
                let expected = expected_output(&prepared.session).unwrap();
                assert_eq!(
                    join_blocks(&expected),
                    case.published(),
                    "{} {}",
                    corpus.name,
                    case.label()
                );
            }
        }
    }

    #[test]
    fn test_sp800_38a_records_span_four_blocks() {
        let parsed = SP800_38A_CTR.parse();
        assert_eq!(parsed.cases.len(), 4);
        assert_eq!(parsed.cases[0].plaintext.len(), 64);
        assert_eq!(parsed.cases[1].key.len(), 32);
    }
}
