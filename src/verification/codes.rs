use uuid::Uuid;

/// Length of an in-person verification code.
pub const CODE_LEN: usize = 6;

/// Generates an opaque six-digit code. Uniqueness across tasks is not
/// required; codes are only ever compared against the counterparty code of
/// the same task.
pub fn generate_code() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) % 1_000_000;
    format!("{:06}", n)
}

/// Generates the (requestor, doer) code pair issued at approval time. The
/// two codes are guaranteed distinct so the cross-wise check cannot be
/// satisfied by echoing your own code back.
pub fn generate_code_pair() -> (String, String) {
    let requestor_code = generate_code();
    loop {
        let doer_code = generate_code();
        if doer_code != requestor_code {
            return (requestor_code, doer_code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_pair_is_distinct() {
        for _ in 0..100 {
            let (requestor, doer) = generate_code_pair();
            assert_ne!(requestor, doer);
        }
    }
}
