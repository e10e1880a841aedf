use assert_cmd::Command;
use predicates::prelude::*;

const WIF: &str = "5KN7MzqK5wt2TP1fQCYyHBtDrXdJuXbUzm4A9rKAteGu3Qi5CVR";
const HEX: &str = "cbf4b9f70470856bb4f40f80b87edb90865997ffee6df315ab166d713af433a5";
const ENCRYPTED: &str = "6PRVWUbkzzsbcVac2qwfssoUJAN1Xhrg6bNk8J7Nzm5H7kxEbn2Nh2ZoGg";

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bip38crypt"));
    cmd.env_remove("BIP38_PASSPHRASE")
        .env_remove("BIP38_KDF_BACKEND");
    cmd
}

// cheap scrypt so round trips stay fast
fn cheap() -> Command {
    let mut cmd = bin();
    cmd.args(["--scrypt-log-n", "4", "--scrypt-r", "8", "--scrypt-p", "1"]);
    cmd
}

fn encrypt_cheap(key: &str, passphrase: &str) -> String {
    let output = cheap()
        .env("BIP38_PASSPHRASE", passphrase)
        .arg("encrypt")
        .arg(key)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn encrypt_and_decrypt_roundtrip() {
    let encrypted = encrypt_cheap(WIF, "pw");
    assert!(encrypted.starts_with("6P"));

    cheap()
        .env("BIP38_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg(&encrypted)
        .assert()
        .success()
        .stdout(predicate::str::contains(WIF));
}

#[test]
fn hex_input_and_output() {
    let encrypted = encrypt_cheap(HEX, "pw");

    cheap()
        .env("BIP38_PASSPHRASE", "pw")
        .arg("decrypt")
        .arg("--hex")
        .arg(&encrypted)
        .assert()
        .success()
        .stdout(predicate::str::contains(HEX));
}

#[test]
fn decrypt_known_vector_with_default_cost() {
    bin()
        .env("BIP38_PASSPHRASE", "TestingOneTwoThree")
        .arg("decrypt")
        .arg(ENCRYPTED)
        .assert()
        .success()
        .stdout(predicate::str::contains(WIF));
}

#[test]
fn wrong_passphrase_fails() {
    let encrypted = encrypt_cheap(WIF, "pw");

    cheap()
        .env("BIP38_PASSPHRASE", "wrong")
        .arg("decrypt")
        .arg(&encrypted)
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect passphrase"));
}

#[test]
fn passphrase_can_be_piped() {
    let encrypted = cheap()
        .arg("encrypt")
        .arg(WIF)
        .write_stdin("piped\npiped\n")
        .output()
        .unwrap();
    assert!(encrypted.status.success());
    let encrypted = String::from_utf8(encrypted.stdout).unwrap();

    cheap()
        .arg("decrypt")
        .arg(encrypted.trim())
        .write_stdin("piped\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(WIF));
}

#[test]
fn mismatched_piped_confirmation_fails() {
    cheap()
        .arg("encrypt")
        .arg(WIF)
        .write_stdin("one\ntwo\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passphrases do not match"));
}

#[test]
fn invalid_private_key_fails() {
    cheap()
        .env("BIP38_PASSPHRASE", "pw")
        .arg("encrypt")
        .arg("not-a-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read private key"));
}

#[test]
fn inspect_prints_fields_without_passphrase() {
    bin()
        .arg("inspect")
        .arg(ENCRYPTED)
        .assert()
        .success()
        .stdout(predicate::str::contains("0xc0"));
}

#[test]
fn inspect_json_output() {
    let output = bin()
        .arg("inspect")
        .arg("--json")
        .arg(ENCRYPTED)
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["flag"], "0xc0");
    assert_eq!(info["salt"].as_str().unwrap().len(), 8);
}

#[test]
fn inspect_rejects_garbage() {
    bin()
        .arg("inspect")
        .arg("6PRVWUbkzzsbcVac2qwfssoUJAN1Xhrg6bNk8J7Nzm5H7kxEbn2Nh2ZoGh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a non-EC-multiply BIP38 key"));
}

#[test]
fn generate_prints_encrypted_key() {
    cheap()
        .env("BIP38_PASSPHRASE", "pw")
        .arg("generate")
        .arg("--show-key")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted  6P"))
        .stdout(predicate::str::contains("wif        5"));
}

#[test]
fn unknown_backend_fails() {
    bin()
        .env("BIP38_PASSPHRASE", "pw")
        .env("BIP38_KDF_BACKEND", "bcrypt")
        .arg("decrypt")
        .arg(ENCRYPTED)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key derivation backend"));
}

#[test]
fn invalid_scrypt_parameters_fail() {
    bin()
        .env("BIP38_PASSPHRASE", "pw")
        .args(["--scrypt-p", "0"])
        .arg("decrypt")
        .arg(ENCRYPTED)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallelism"));
}
