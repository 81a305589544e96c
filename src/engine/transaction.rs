use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bincode::error::DecodeError;
use bincode::serde::decode_from_slice;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::SignerError;
use solana_sdk::transaction::VersionedTransaction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeTxError {
    #[error("base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("bincode 解码失败: {0}")]
    Bincode(#[from] DecodeError),
}

/// 解码 Jupiter 返回的 base64 未签名交易。
pub fn decode_base64_transaction(encoded: &str) -> Result<VersionedTransaction, DecodeTxError> {
    let bytes = BASE64_STANDARD.decode(encoded.trim())?;
    let (tx, _) = decode_from_slice::<VersionedTransaction, _>(&bytes, bincode_config())?;
    Ok(tx)
}

/// 用持有的私钥重新签名整笔交易。私钥必须是消息要求的唯一签名者。
pub fn sign_transaction(
    unsigned: VersionedTransaction,
    signer: &Keypair,
) -> Result<VersionedTransaction, SignerError> {
    VersionedTransaction::try_new(unsigned.message, &[signer])
}

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

#[cfg(test)]
pub(crate) fn encode_base64_transaction(tx: &VersionedTransaction) -> String {
    let bytes = bincode::serde::encode_to_vec(tx, bincode_config()).expect("encode transaction");
    BASE64_STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::instruction::Instruction;
    use solana_sdk::message::{Message, VersionedMessage};
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::{Signature, Signer};

    fn unsigned_for(payer: &Pubkey) -> VersionedTransaction {
        let instruction = Instruction::new_with_bytes(Pubkey::new_unique(), &[1, 2, 3], vec![]);
        let message = Message::new(&[instruction], Some(payer));
        VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::Legacy(message),
        }
    }

    #[test]
    fn decodes_and_signs_jupiter_payload() {
        let signer = Keypair::new();
        let encoded = encode_base64_transaction(&unsigned_for(&signer.pubkey()));

        let decoded = decode_base64_transaction(&format!("  {encoded}\n")).expect("decode");
        assert_eq!(decoded.signatures, vec![Signature::default()]);

        let signed = sign_transaction(decoded, &signer).expect("sign");
        assert_eq!(signed.signatures.len(), 1);
        assert_ne!(signed.signatures[0], Signature::default());
        assert!(signed.verify_with_results().iter().all(|ok| *ok));
    }

    #[test]
    fn rejects_foreign_payer() {
        let encoded = encode_base64_transaction(&unsigned_for(&Pubkey::new_unique()));
        let decoded = decode_base64_transaction(&encoded).expect("decode");
        assert!(sign_transaction(decoded, &Keypair::new()).is_err());
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(matches!(
            decode_base64_transaction("@@not-base64@@"),
            Err(DecodeTxError::Base64(_))
        ));
        assert!(matches!(
            decode_base64_transaction("AQID"),
            Err(DecodeTxError::Bincode(_))
        ));
    }
}
