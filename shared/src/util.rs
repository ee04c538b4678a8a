/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Reference number prefixes used by the fulfillment workflow
pub mod prefix {
    pub const ORDER: &str = "ORD";
    pub const INVOICE: &str = "INV";
    pub const PAYMENT: &str = "PAY";
    pub const PRINTING_JOB: &str = "JOB";
    pub const GRN: &str = "GRN";
    pub const RECEIPT: &str = "REC";
}

/// Generate a human-readable reference number: `prefix + unix_millis + NNN`.
///
/// The random suffix is 0..=999, zero-padded so every reference of one prefix
/// has the same layout. Uniqueness is probabilistic; the UNIQUE column
/// constraint on each reference column catches the rare collision.
pub fn reference_number(prefix: &str) -> String {
    use rand::Rng;
    let suffix: u16 = rand::thread_rng().gen_range(0..=999);
    format!("{}{}{:03}", prefix, now_millis(), suffix)
}
