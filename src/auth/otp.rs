use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;

pub const CODE_TTL_MINUTES: i64 = 5;

/// Six digits, zero-padded, uniformly drawn.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

pub fn expiry_from(issued_at: NaiveDateTime) -> NaiveDateTime {
    issued_at + TimeDelta::minutes(CODE_TTL_MINUTES)
}

pub fn delivery_message(code: &str) -> String {
    format!("Your UpSign verification code is {code}. It expires in {CODE_TTL_MINUTES} minutes.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn expiry_lands_in_the_future() {
        let issued = chrono::Utc::now().naive_utc();
        assert!(expiry_from(issued) > issued);
    }

    #[test]
    fn delivery_message_carries_the_code() {
        let message = delivery_message("042187");
        assert!(message.contains("042187"));
    }
}
