//! Trash entry id generation.

use rand::Rng;

use crate::config::ID_SUFFIX_LEN;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Encode a number in lowercase base36.
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Every byte comes from BASE36, so this is always ASCII.
    digits.into_iter().map(char::from).collect()
}

/// Build a trash id: base36 timestamp, a dash, then random base36 characters.
pub fn make_id(now_ms: u64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("{}-{}", to_base36(now_ms), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_704_067_200_000), "lqu5m2o0");
    }

    #[test]
    fn test_make_id_shape() {
        let id = make_id(36);
        let (stamp, suffix) = id.split_once('-').unwrap();
        assert_eq!(stamp, "10");
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_make_id_varies() {
        let a = make_id(1);
        let b = make_id(1);
        let c = make_id(1);
        assert!(a != b || b != c);
    }
}
