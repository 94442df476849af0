use rand::Rng;
use rand::seq::SliceRandom;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!#$%&()*+";

const NR_LETTERS: usize = 6;
const NR_NUMBERS: usize = 3;
const NR_SYMBOLS: usize = 3;

/// Random password: 6 letters, 3 digits and 3 symbols in shuffled order.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let mut chars: Vec<char> = Vec::with_capacity(NR_LETTERS + NR_NUMBERS + NR_SYMBOLS);

    for (pool, n) in [
        (LETTERS, NR_LETTERS),
        (NUMBERS, NR_NUMBERS),
        (SYMBOLS, NR_SYMBOLS),
    ] {
        chars.extend((0..n).map(|_| pool[rng.gen_range(0..pool.len())] as char));
    }

    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}
