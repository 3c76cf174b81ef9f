use crate::data::{round5, PositionFix};
use crate::error::Result;
use crate::provider::{name_stem, normalize_identifier, PositionProvider, ProviderKind};
use crate::utils::clock::Clock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;

const LAT_MODULUS: u64 = 1_200_000;
const LON_DIVISOR: u64 = 1_200_000;
const LON_MODULUS: u64 = 3_400_000;
const COORD_SCALE: f64 = 10_000.0;

/// SHA-256 digest read as a big-endian unsigned 256-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed([u8; 32]);

impl Seed {
    pub fn from_identifier(identifier: &str) -> Self {
        Self(Sha256::digest(identifier.as_bytes()).into())
    }

    /// `self mod modulus`, by Horner's rule over the base-256 digits
    ///
    /// `modulus` must stay below 2^56.
    pub fn rem(&self, modulus: u64) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, &byte| (acc * 256 + u64::from(byte)) % modulus)
    }

    /// `self div divisor`, by schoolbook long division
    ///
    /// The running remainder stays below `divisor`, so every quotient digit fits a byte.
    pub fn div(&self, divisor: u64) -> Self {
        let mut quotient = [0u8; 32];
        let mut remainder = 0u64;

        for (digit, &byte) in quotient.iter_mut().zip(self.0.iter()) {
            let current = remainder * 256 + u64::from(byte);
            *digit = (current / divisor) as u8;
            remainder = current % divisor;
        }

        Self(quotient)
    }
}

/// Deterministic position generator
///
/// The same identifier always lands on the same coordinates, speed and heading;
/// only `last_update` follows the clock.
///
/// Mapping (h = SHA-256 of the normalized identifier):
/// - lat = (h mod 1_200_000) / 10000 - 60            → [-60, 60)
/// - lon = ((h div 1_200_000) mod 3_400_000) / 10000 - 170 → [-170, 170)
/// - speed = 16 + h mod 8 knots
/// - heading = h mod 360
pub struct SyntheticProvider {
    clock: Arc<dyn Clock>,
}

impl SyntheticProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn fix_at(identifier: &str, now: DateTime<Utc>) -> PositionFix {
        let id = normalize_identifier(identifier);
        let seed = Seed::from_identifier(&id);

        let lat = seed.rem(LAT_MODULUS) as f64 / COORD_SCALE - 60.0;
        let lon = seed.div(LON_DIVISOR).rem(LON_MODULUS) as f64 / COORD_SCALE - 170.0;

        PositionFix {
            vessel_name: format!("MV-{}", name_stem(&id)),
            lat: round5(lat),
            lon: round5(lon),
            speed_knots: (16 + seed.rem(8)) as f64,
            heading: seed.rem(360) as u16,
            last_update: now,
        }
    }
}

#[async_trait]
impl PositionProvider for SyntheticProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Synthetic
    }

    async fn resolve(&self, identifier: &str) -> Result<PositionFix> {
        Ok(Self::fix_at(identifier, self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::{FixedClock, SystemClock};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_seed_arithmetic() {
        // 0x01_00 = 256
        let mut bytes = [0u8; 32];
        bytes[30] = 1;
        let seed = Seed(bytes);
        assert_eq!(seed.rem(1000), 256);
        assert_eq!(seed.rem(7), 256 % 7);
        assert_eq!(seed.div(16).rem(1_000_003), 16);
        assert_eq!(seed.div(1000).rem(1_000_003), 0);
    }

    #[test]
    fn test_seed_division_identity() {
        // h = q * d + r must hold for the digest of a real identifier
        let seed = Seed::from_identifier("MSCU1234567");
        let d = 1_200_000;
        let m = 999_983;
        let q = seed.div(d).rem(m);
        let r = seed.rem(d);
        assert_eq!((q * d + r) % m, seed.rem(m));
    }

    #[test]
    fn test_golden_mscu1234567() {
        let fix = SyntheticProvider::fix_at("MSCU1234567", at());

        assert_eq!(fix.vessel_name, "MV-MSCU");
        assert_close(fix.lat, 12.7035);
        assert_close(fix.lon, -69.5265);
        assert_eq!(fix.speed_knots, 19.0);
        assert_eq!(fix.heading, 195);
        assert_eq!(fix.last_update, at());
    }

    #[test]
    fn test_golden_demo_fleet() {
        let cases = [
            ("MAEU7654321", 58.9236, 43.2301, 20.0, 156),
            ("CMAU2468101", 36.2193, -117.997, 17.0, 273),
            ("HLCU1357913", 57.4661, 140.8009, 21.0, 101),
            ("ONEU9988776", -10.1064, -151.2663, 16.0, 216),
        ];

        for (id, lat, lon, speed, heading) in cases {
            let fix = SyntheticProvider::fix_at(id, at());
            assert_close(fix.lat, lat);
            assert_close(fix.lon, lon);
            assert_eq!(fix.speed_knots, speed, "speed for {id}");
            assert_eq!(fix.heading, heading, "heading for {id}");
        }
    }

    #[test]
    fn test_empty_and_lowercase_identifiers() {
        let golden = SyntheticProvider::fix_at("MSCU1234567", at());
        assert!(SyntheticProvider::fix_at("", at()).same_position(&golden));
        assert!(SyntheticProvider::fix_at("mscu1234567", at()).same_position(&golden));
    }

    #[tokio::test]
    async fn test_resolve_uses_clock() {
        let provider = SyntheticProvider::new(Arc::new(FixedClock(at())));
        let fix = provider.resolve("MSCU1234567").await.unwrap();
        assert_eq!(fix.last_update, at());
        assert_eq!(provider.kind(), ProviderKind::Synthetic);
    }

    #[tokio::test]
    async fn test_repeat_calls_agree() {
        let provider = SyntheticProvider::new(Arc::new(SystemClock));
        let first = provider.resolve("TGHU9876543").await.unwrap();
        let second = provider.resolve("TGHU9876543").await.unwrap();
        assert!(first.same_position(&second));
        assert!(second.last_update >= first.last_update);
    }

    proptest! {
        #[test]
        fn prop_synthetic_in_bounds(id in "\\PC{0,24}") {
            let fix = SyntheticProvider::fix_at(&id, at());
            prop_assert!(fix.lat >= -60.0 && fix.lat < 60.0);
            prop_assert!(fix.lon >= -170.0 && fix.lon < 170.0);
            prop_assert!(fix.speed_knots >= 16.0 && fix.speed_knots <= 23.0);
            prop_assert!(fix.heading < 360);
            prop_assert!(fix.vessel_name.starts_with("MV-"));
        }

        #[test]
        fn prop_synthetic_deterministic(id in "[A-Za-z0-9]{0,16}") {
            let a = SyntheticProvider::fix_at(&id, at());
            let b = SyntheticProvider::fix_at(&id, at());
            prop_assert_eq!(a, b);
        }
    }
}
