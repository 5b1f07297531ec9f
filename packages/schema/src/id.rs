//! Node id generation.

use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 9;

/// Generate a collision-resistant node id of the form `node_<random>_<timestamp>`.
///
/// Both fragments are base-36. Uniqueness is probabilistic; ids are not
/// sortable and callers must not rely on their ordering.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    let random: String = (0..RANDOM_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    format!("node_{}_{}", random, to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
