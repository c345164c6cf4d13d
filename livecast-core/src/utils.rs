use uuid::Uuid;

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

/// Length of the random part of a generated room identifier.
pub const ROOM_SUFFIX_LEN: usize = 5;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base36 string of `len` characters.
///
/// Digits come from a v4 uuid, which carries 122 random bits: enough for
/// 23 independent base36 digits. Longer strings repeat the leading `0`.
pub fn random_base36(len: usize) -> String {
    let mut value = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(BASE36[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}
