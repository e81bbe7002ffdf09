use std::fs::File;

use anyhow::{anyhow, Context, Result};
use pgp::composed::{KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey};
use pgp::ser::Serialize as _;
use pgp::types::SecretKeyTrait;
use suitcasectl_options::KeysArgs;

/// `create keys`: generate an OpenPGP keypair for use with
/// `--public-key`/`--encrypt-inner`, without vendoring a keyring or
/// keyserver client.
pub(crate) fn handle(args: KeysArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let (secret_key, public_key) = generate_keypair(&args.name, args.email.as_deref())?;

    let sec_path = args.out_dir.join(format!("{}.sec.asc", args.name));
    let pub_path = args.out_dir.join(format!("{}.pub.asc", args.name));

    let mut sec_file = File::create(&sec_path)
        .with_context(|| format!("creating {}", sec_path.display()))?;
    secret_key
        .to_armored_writer(&mut sec_file, Default::default())
        .map_err(|e| anyhow!("armoring secret key: {e}"))?;

    let mut pub_file = File::create(&pub_path)
        .with_context(|| format!("creating {}", pub_path.display()))?;
    public_key
        .to_armored_writer(&mut pub_file, Default::default())
        .map_err(|e| anyhow!("armoring public key: {e}"))?;

    println!("wrote {}", sec_path.display());
    println!("wrote {}", pub_path.display());
    Ok(())
}

fn generate_keypair(name: &str, email: Option<&str>) -> Result<(SignedSecretKey, SignedPublicKey)> {
    let user_id = match email {
        Some(email) => format!("{name} <{email}>"),
        None => name.to_string(),
    };

    let mut params = SecretKeyParamsBuilder::default();
    params
        .key_type(KeyType::Rsa(2048))
        .can_create_certificates(false)
        .can_sign(true)
        .can_encrypt(true)
        .primary_user_id(user_id);

    let params = params
        .build()
        .map_err(|e| anyhow!("building key params: {e}"))?;
    let secret_key = params
        .generate()
        .map_err(|e| anyhow!("generating key: {e}"))?;

    let passwd_fn = String::new;
    let signed_secret_key = secret_key
        .sign(passwd_fn)
        .map_err(|e| anyhow!("self-signing secret key: {e}"))?;
    let signed_public_key = signed_secret_key
        .public_key()
        .sign(&signed_secret_key, passwd_fn)
        .map_err(|e| anyhow!("self-signing public key: {e}"))?;

    Ok((signed_secret_key, signed_public_key))
}
