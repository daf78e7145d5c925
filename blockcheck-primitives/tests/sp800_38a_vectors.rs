#![deny(unsafe_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]

//! NIST SP 800-38A Appendix F vectors for every mode and key size.
//!
//! Each vector encrypts the four SP 800-38A example plaintext blocks and is
//! checked in both directions against the reference model.

use blockcheck_primitives::{
    Block, ChainingParams, CipherKey, CounterBlock, Direction, Mode, ReferenceModel, Session,
    expected_output,
};

const PLAINTEXT: [&str; 4] = [
    "6bc1bee22e409f96e93d7e117393172a",
    "ae2d8a571e03ac9c9eb76fac45af8e51",
    "30c81c46a35ce411e5fbc1191a0a52ef",
    "f69f2445df4f9b17ad2b417be66c3710",
];

struct Sp80038aVector {
    name: &'static str,
    mode: Mode,
    key: &'static str,
    iv: Option<&'static str>,
    ciphertext: [&'static str; 4],
}

const VECTORS: &[Sp80038aVector] = &[
    Sp80038aVector {
        name: "ECB-AES128",
        mode: Mode::Ecb,
        key: "2b7e151628aed2a6abf7158809cf4f3c",
        iv: None,
        ciphertext: [
            "3ad77bb40d7a3660a89ecaf32466ef97",
            "f5d3d58503b9699de785895a96fdbaaf",
            "43b1cd7f598ece23881b00e3ed030688",
            "7b0c785e27e8ad3f8223207104725dd4",
        ],
    },
    Sp80038aVector {
        name: "CBC-AES128",
        mode: Mode::Cbc,
        key: "2b7e151628aed2a6abf7158809cf4f3c",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "7649abac8119b246cee98e9b12e9197d",
            "5086cb9b507219ee95db113a917678b2",
            "73bed6b8e3c1743b7116e69e22229516",
            "3ff1caa1681fac09120eca307586e1a7",
        ],
    },
    Sp80038aVector {
        name: "CFB-AES128",
        mode: Mode::Cfb,
        key: "2b7e151628aed2a6abf7158809cf4f3c",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "3b3fd92eb72dad20333449f8e83cfb4a",
            "c8a64537a0b3a93fcde3cdad9f1ce58b",
            "26751f67a3cbb140b1808cf187a4f4df",
            "c04b05357c5d1c0eeac4c66f9ff7f2e6",
        ],
    },
    Sp80038aVector {
        name: "OFB-AES128",
        mode: Mode::Ofb,
        key: "2b7e151628aed2a6abf7158809cf4f3c",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "3b3fd92eb72dad20333449f8e83cfb4a",
            "7789508d16918f03f53c52dac54ed825",
            "9740051e9c5fecf64344f7a82260edcc",
            "304c6528f659c77866a510d9c1d6ae5e",
        ],
    },
    Sp80038aVector {
        name: "CTR-AES128",
        mode: Mode::Ctr,
        key: "2b7e151628aed2a6abf7158809cf4f3c",
        iv: Some("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        ciphertext: [
            "874d6191b620e3261bef6864990db6ce",
            "9806f66b7970fdff8617187bb9fffdff",
            "5ae4df3edbd5d35e5b4f09020db03eab",
            "1e031dda2fbe03d1792170a0f3009cee",
        ],
    },
    Sp80038aVector {
        name: "ECB-AES192",
        mode: Mode::Ecb,
        key: "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        iv: None,
        ciphertext: [
            "bd334f1d6e45f25ff712a214571fa5cc",
            "974104846d0ad3ad7734ecb3ecee4eef",
            "ef7afd2270e2e60adce0ba2face6444e",
            "9a4b41ba738d6c72fb16691603c18e0e",
        ],
    },
    Sp80038aVector {
        name: "CBC-AES192",
        mode: Mode::Cbc,
        key: "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "4f021db243bc633d7178183a9fa071e8",
            "b4d9ada9ad7dedf4e5e738763f69145a",
            "571b242012fb7ae07fa9baac3df102e0",
            "08b0e27988598881d920a9e64f5615cd",
        ],
    },
    Sp80038aVector {
        name: "CFB-AES192",
        mode: Mode::Cfb,
        key: "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "cdc80d6fddf18cab34c25909c99a4174",
            "67ce7f7f81173621961a2b70171d3d7a",
            "2e1e8a1dd59b88b1c8e60fed1efac4c9",
            "c05f9f9ca9834fa042ae8fba584b09ff",
        ],
    },
    Sp80038aVector {
        name: "OFB-AES192",
        mode: Mode::Ofb,
        key: "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "cdc80d6fddf18cab34c25909c99a4174",
            "fcc28b8d4c63837c09e81700c1100401",
            "8d9a9aeac0f6596f559c6d4daf59a5f2",
            "6d9f200857ca6c3e9cac524bd9acc92a",
        ],
    },
    Sp80038aVector {
        name: "CTR-AES192",
        mode: Mode::Ctr,
        key: "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        iv: Some("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        ciphertext: [
            "1abc932417521ca24f2b0459fe7e6e0b",
            "090339ec0aa6faefd5ccc2c6f4ce8e94",
            "1e36b26bd1ebc670d1bd1d665620abf7",
            "4f78a7f6d29809585a97daec58c6b050",
        ],
    },
    Sp80038aVector {
        name: "ECB-AES256",
        mode: Mode::Ecb,
        key: "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        iv: None,
        ciphertext: [
            "f3eed1bdb5d2a03c064b5a7e3db181f8",
            "591ccb10d410ed26dc5ba74a31362870",
            "b6ed21b99ca6f4f9f153e7b1beafed1d",
            "23304b7a39f9f3ff067d8d8f9e24ecc7",
        ],
    },
    Sp80038aVector {
        name: "CBC-AES256",
        mode: Mode::Cbc,
        key: "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "f58c4c04d6e5f1ba779eabfb5f7bfbd6",
            "9cfc4e967edb808d679f777bc6702c7d",
            "39f23369a9d9bacfa530e26304231461",
            "b2eb05e2c39be9fcda6c19078c6a9d1b",
        ],
    },
    Sp80038aVector {
        name: "CFB-AES256",
        mode: Mode::Cfb,
        key: "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "dc7e84bfda79164b7ecd8486985d3860",
            "39ffed143b28b1c832113c6331e5407b",
            "df10132415e54b92a13ed0a8267ae2f9",
            "75a385741ab9cef82031623d55b1e471",
        ],
    },
    Sp80038aVector {
        name: "OFB-AES256",
        mode: Mode::Ofb,
        key: "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        iv: Some("000102030405060708090a0b0c0d0e0f"),
        ciphertext: [
            "dc7e84bfda79164b7ecd8486985d3860",
            "4febdc6740d20b3ac88f6ad82a4fb08d",
            "71ab47a086e86eedf39d1c5bba97c408",
            "0126141d67f37be8538f5a8be740e484",
        ],
    },
    Sp80038aVector {
        name: "CTR-AES256",
        mode: Mode::Ctr,
        key: "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        iv: Some("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        ciphertext: [
            "601ec313775789a5b7a7f504bbf3d228",
            "f443e3ca4d62b59aca84e990cacaf5c5",
            "2b0930daa23de94ce87017ba2d84988d",
            "dfc9c58db67aada613c2dd08457941a6",
        ],
    },
];

fn blocks(hex: &[&str]) -> Vec<Block> {
    hex.iter().map(|h| Block::from_hex(h).unwrap()).collect()
}

fn params(vector: &Sp80038aVector) -> ChainingParams {
    match (vector.mode, vector.iv) {
        (Mode::Ecb, _) => ChainingParams::None,
        (Mode::Ctr, Some(iv)) => {
            ChainingParams::Counter(CounterBlock::from_block(Block::from_hex(iv).unwrap()))
        }
        (_, Some(iv)) => ChainingParams::Iv(Block::from_hex(iv).unwrap()),
        (mode, None) => panic!("{mode} vector without IV"),
    }
}

fn session(vector: &Sp80038aVector, direction: Direction, input: Vec<Block>) -> Session {
    Session::new(
        vector.mode,
        CipherKey::from_hex(vector.key).unwrap(),
        direction,
        params(vector),
        input,
    )
    .unwrap()
}

#[test]
fn test_sp800_38a_encrypt() {
    for vector in VECTORS {
        let s = session(vector, Direction::Encrypt, blocks(&PLAINTEXT));
        let out = expected_output(&s).unwrap();
        assert_eq!(out, blocks(&vector.ciphertext), "{} encrypt", vector.name);
    }
}

#[test]
fn test_sp800_38a_decrypt() {
    for vector in VECTORS {
        let s = session(vector, Direction::Decrypt, blocks(&vector.ciphertext));
        let out = expected_output(&s).unwrap();
        assert_eq!(out, blocks(&PLAINTEXT), "{} decrypt", vector.name);
    }
}

#[test]
fn test_cfb_and_ofb_share_first_block() {
    // both start from E(IV), so block 0 agrees and block 1 diverges
    let keys = [
        "2b7e151628aed2a6abf7158809cf4f3c",
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
    ];
    for key in keys {
        let cfb = VECTORS.iter().find(|v| v.mode == Mode::Cfb && v.key == key).unwrap();
        let ofb = VECTORS.iter().find(|v| v.mode == Mode::Ofb && v.key == key).unwrap();
        assert_eq!(cfb.ciphertext[0], ofb.ciphertext[0]);
        assert_ne!(cfb.ciphertext[1], ofb.ciphertext[1]);
    }
}

#[test]
fn test_block_order_matters_for_chained_modes() {
    for vector in VECTORS.iter().filter(|v| matches!(v.mode, Mode::Cbc | Mode::Cfb)) {
        let mut reversed = blocks(&PLAINTEXT);
        reversed.reverse();
        let s = session(vector, Direction::Encrypt, reversed);
        let out = expected_output(&s).unwrap();
        assert_ne!(out[3], Block::from_hex(vector.ciphertext[0]).unwrap(), "{}", vector.name);
    }
}

#[test]
fn test_prefix_consistency() {
    // processing a prefix yields the prefix of the full output
    for vector in VECTORS {
        let model = ReferenceModel::new(
            vector.mode,
            &CipherKey::from_hex(vector.key).unwrap(),
            Direction::Encrypt,
            &params(vector),
        )
        .unwrap();
        let full = model.process(&blocks(&PLAINTEXT));
        let prefix = model.process(&blocks(&PLAINTEXT[..2]));
        assert_eq!(&full[..2], prefix.as_slice(), "{}", vector.name);
    }
}
