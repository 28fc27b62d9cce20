//! Key, certificate and password helpers.
//!
//! The certificate, key and password functions return fixed placeholder
//! material derived from their inputs. They let templates that expect these
//! names render, but produce nothing usable as real key material.
//!
//! `encryptAES`/`decryptAES` are real AES-256-CBC with PKCS#7 padding. The
//! key is the SHA-256 of the password and the output is base64 of
//! `iv || ciphertext`.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::encoding::hex_digest;
use crate::error::{FuncError, FuncResult};
use crate::function::{Args, Arity, Function};
use crate::value::Value;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const IV_LEN: usize = 16;

const PASSWORD_TEMPLATES: &[&str] = &["long", "maximum", "medium", "short", "basic", "pin"];

/// Wraps `data` in PEM armour for `kind`.
pub fn pem(kind: &str, data: &str) -> String {
    format!("-----BEGIN {kind}-----\n{data}\n-----END {kind}-----")
}

fn mock_private_key(key_type: &str) -> String {
    let kind = match key_type.to_lowercase().as_str() {
        "rsa" => "RSA PRIVATE KEY",
        "dsa" => "DSA PRIVATE KEY",
        "ecdsa" => "EC PRIVATE KEY",
        "ed25519" => "PRIVATE KEY",
        _ => return format!("Unknown type {}", key_type),
    };
    pem(kind, &STANDARD.encode("mock-private-key"))
}

fn mock_certificate(label: &str) -> String {
    pem("CERTIFICATE", &STANDARD.encode(label))
}

fn cert_pair(cert: String, key: String) -> Value {
    Value::map([("Cert", cert), ("Key", key)])
}

fn aes_key(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Encrypts `plaintext`, returning base64 of a random IV followed by the
/// ciphertext.
pub fn encrypt_aes(password: &str, plaintext: &str) -> Result<String, FuncError> {
    let iv: [u8; IV_LEN] = rand::random();
    let cipher = Aes256CbcEnc::new_from_slices(&aes_key(password), &iv)
        .map_err(|e| FuncError::Encoding(e.to_string()))?;
    let mut out = iv.to_vec();
    out.extend(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes()));
    Ok(STANDARD.encode(out))
}

/// Reverses [`encrypt_aes`].
pub fn decrypt_aes(password: &str, encoded: &str) -> Result<String, FuncError> {
    let data = STANDARD
        .decode(encoded)
        .map_err(|e| FuncError::Encoding(e.to_string()))?;
    if data.len() < IV_LEN {
        return Err(FuncError::Encoding("ciphertext too short".to_string()));
    }
    let (iv, ciphertext) = data.split_at(IV_LEN);
    let cipher = Aes256CbcDec::new_from_slices(&aes_key(password), iv)
        .map_err(|e| FuncError::Encoding(e.to_string()))?;
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| FuncError::Encoding("invalid padding".to_string()))?;
    Ok(String::from_utf8_lossy(&plain).into_owned())
}

fn bcrypt_hash(input: &str) -> String {
    hex_digest::<Sha256>(format!("{}bcrypt", input).as_bytes())
}

fn bcrypt(args: Args<'_>) -> FuncResult {
    Ok(bcrypt_hash(&args.text(0)).into())
}

fn htpasswd(args: Args<'_>) -> FuncResult {
    let user = args.text(0);
    let password = args.text(1);
    if user.contains(':') {
        return Ok(format!("invalid username: {}", user).into());
    }
    let line = match args.text(2).to_lowercase().as_str() {
        "sha" => format!("{}:{{SHA}}{}", user, STANDARD.encode(Sha1::digest(password.as_bytes()))),
        "bcrypt" => format!("{}:{}", user, bcrypt_hash(&password)),
        _ => format!("{}:{}", user, hex_digest::<Sha256>(password.as_bytes())),
    };
    Ok(line.into())
}

fn gen_private_key(args: Args<'_>) -> FuncResult {
    Ok(mock_private_key(&args.text(0)).into())
}

fn derive_password(args: Args<'_>) -> FuncResult {
    let kind = args.text(1);
    if !PASSWORD_TEMPLATES.contains(&kind.as_str()) {
        return Ok(format!("cannot find password template {}", kind).into());
    }
    let input = format!(
        "{}:{}:{}:{}:{}",
        args.int(0),
        kind,
        args.text(2),
        args.text(3),
        args.text(4)
    );
    let mut digest = hex_digest::<Sha256>(input.as_bytes());
    digest.truncate(16);
    Ok(digest.into())
}

fn build_custom_cert(args: Args<'_>) -> FuncResult {
    let decode = |i: usize| {
        STANDARD
            .decode(args.text(i))
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    };
    Ok(cert_pair(decode(0), decode(1)))
}

fn gen_ca(_: Args<'_>) -> FuncResult {
    Ok(cert_pair(mock_certificate("mock-ca-cert"), mock_private_key("rsa")))
}

fn gen_ca_with_key(args: Args<'_>) -> FuncResult {
    Ok(cert_pair(mock_certificate("mock-ca-cert"), args.text(2)))
}

fn gen_self_signed_cert(_: Args<'_>) -> FuncResult {
    Ok(cert_pair(
        mock_certificate("mock-self-signed-cert"),
        mock_private_key("rsa"),
    ))
}

fn gen_self_signed_cert_with_key(args: Args<'_>) -> FuncResult {
    Ok(cert_pair(mock_certificate("mock-self-signed-cert"), args.text(4)))
}

fn gen_signed_cert(_: Args<'_>) -> FuncResult {
    Ok(cert_pair(mock_certificate("mock-signed-cert"), mock_private_key("rsa")))
}

fn gen_signed_cert_with_key(args: Args<'_>) -> FuncResult {
    Ok(cert_pair(mock_certificate("mock-signed-cert"), args.text(5)))
}

fn add_pem_header(args: Args<'_>) -> FuncResult {
    Ok(pem(&args.text(0), &args.text(1)).into())
}

fn encrypt_aes_fn(args: Args<'_>) -> FuncResult {
    Ok(encrypt_aes(&args.text(0), &args.text(1))
        .unwrap_or_default()
        .into())
}

fn decrypt_aes_fn(args: Args<'_>) -> FuncResult {
    Ok(decrypt_aes(&args.text(0), &args.text(1))
        .unwrap_or_default()
        .into())
}

pub(crate) const FUNCTIONS: &[Function] = &[
    Function::new("bcrypt", Arity::Exact(1), bcrypt),
    Function::new("htpasswd", Arity::Range(2, 3), htpasswd),
    Function::new("genPrivateKey", Arity::Exact(1), gen_private_key),
    Function::new("derivePassword", Arity::Exact(5), derive_password),
    Function::new("buildCustomCert", Arity::Exact(2), build_custom_cert),
    Function::new("genCA", Arity::Exact(2), gen_ca),
    Function::new("genCAWithKey", Arity::Exact(3), gen_ca_with_key),
    Function::new("genSelfSignedCert", Arity::Exact(4), gen_self_signed_cert),
    Function::new(
        "genSelfSignedCertWithKey",
        Arity::Exact(5),
        gen_self_signed_cert_with_key,
    ),
    Function::new("genSignedCert", Arity::Exact(5), gen_signed_cert),
    Function::new("genSignedCertWithKey", Arity::Exact(6), gen_signed_cert_with_key),
    Function::new("addPEMHeader", Arity::Exact(2), add_pem_header),
    Function::new("encryptAES", Arity::Exact(2), encrypt_aes_fn).impure(),
    Function::new("decryptAES", Arity::Exact(2), decrypt_aes_fn),
];
