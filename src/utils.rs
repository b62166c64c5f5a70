//! Machine-word helpers shared by the domains.

pub fn gcd_unsigned(mut a: u64, mut b: u64) -> u64 {
    let mut c;
    while a != 0 {
        c = a;
        a = b % a;
        b = c;
    }
    b
}

pub fn gcd_signed(mut a: i64, mut b: i64) -> u64 {
    let mut c;
    while a != 0 {
        c = a;
        // only wraps when i64::MIN % -1 and that still yields 0
        a = b.wrapping_rem(a);
        b = c;
    }
    b.unsigned_abs()
}

#[cfg(test)]
mod test {
    use super::{gcd_signed, gcd_unsigned};

    #[test]
    fn machine_gcd() {
        assert_eq!(gcd_unsigned(12, 18), 6);
        assert_eq!(gcd_unsigned(0, 7), 7);
        assert_eq!(gcd_signed(-12, 18), 6);
        assert_eq!(gcd_signed(i64::MIN, 0), 1 << 63);
    }
}
