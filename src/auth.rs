use anyhow::{Result, bail};
use std::io::{self, BufRead, IsTerminal};
use zeroize::Zeroizing;

pub const PASSPHRASE_ENV: &str = "BIP38_PASSPHRASE";

fn from_env() -> Option<Zeroizing<String>> {
    //  BIP38_PASSPHRASE="supersecret" bip38crypt decrypt 6P...
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

pub fn read_passphrase() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    //  echo "supersecret" | bip38crypt decrypt 6P...
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_line(&mut buf)?;
        trim_newline(&mut buf);

        if !buf.is_empty() {
            return Ok(buf);
        }
    }

    if io::stdin().is_terminal() {
        let pw = Zeroizing::new(rpassword::prompt_password("Passphrase: ")?);
        if !pw.is_empty() {
            return Ok(pw);
        }
    }

    bail!("No passphrase provided")
}

pub fn read_new_passphrase_with_confirmation() -> Result<Zeroizing<String>> {
    if let Some(pw) = from_env() {
        return Ok(pw);
    }

    if !io::stdin().is_terminal() {
        let stdin = io::stdin();
        let mut handle = stdin.lock();

        let mut pw1 = Zeroizing::new(String::new());
        let mut pw2 = Zeroizing::new(String::new());

        handle.read_line(&mut pw1)?;
        handle.read_line(&mut pw2)?;

        trim_newline(&mut pw1);
        trim_newline(&mut pw2);

        return confirm(pw1, pw2);
    }

    let pw1 = Zeroizing::new(rpassword::prompt_password("New passphrase: ")?);
    let pw2 = Zeroizing::new(rpassword::prompt_password("Confirm passphrase: ")?);

    confirm(pw1, pw2)
}

fn confirm(pw1: Zeroizing<String>, pw2: Zeroizing<String>) -> Result<Zeroizing<String>> {
    if pw1.is_empty() {
        bail!("passphrase cannot be empty");
    }

    if pw1 != pw2 {
        bail!("passphrases do not match");
    }

    Ok(pw1)
}

fn trim_newline(s: &mut String) {
    while s.ends_with('\n') || s.ends_with('\r') {
        s.pop();
    }
}
