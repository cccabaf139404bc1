use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BandError {
    #[error("invalid Band D amount {0}: must be greater than zero")]
    InvalidInput(Decimal),
    #[error("Band D amount {0} is too large to scale across bands")]
    Overflow(Decimal),
}

/// Council tax valuation band (England)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Band {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Band {
    pub const ALL: [Band; 8] = [
        Band::A,
        Band::B,
        Band::C,
        Band::D,
        Band::E,
        Band::F,
        Band::G,
        Band::H,
    ];

    /// Statutory ratio to Band D, in ninths
    pub fn ninths(&self) -> u32 {
        match self {
            Band::A => 6,
            Band::B => 7,
            Band::C => 8,
            Band::D => 9,
            Band::E => 11,
            Band::F => 13,
            Band::G => 15,
            Band::H => 18,
        }
    }

    pub fn ratio(&self) -> Decimal {
        Decimal::from(self.ninths()) / Decimal::from(9)
    }

    /// Property value range (1 April 1991 valuation) covered by the band
    pub fn valuation_range(&self) -> &'static str {
        match self {
            Band::A => "up to £40,000",
            Band::B => "£40,001 - £52,000",
            Band::C => "£52,001 - £68,000",
            Band::D => "£68,001 - £88,000",
            Band::E => "£88,001 - £120,000",
            Band::F => "£120,001 - £160,000",
            Band::G => "£160,001 - £320,000",
            Band::H => "over £320,000",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Council tax for every band, derived from a single Band D figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandAmounts {
    amounts: [Decimal; 8],
}

impl BandAmounts {
    pub fn get(&self, band: Band) -> Decimal {
        self.amounts[band as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Band, Decimal)> + '_ {
        Band::ALL.into_iter().zip(self.amounts.iter().copied())
    }
}

/// Derive bands A-H from Band D. Amounts are unrounded.
pub fn calculate_bands(band_d: Decimal) -> Result<BandAmounts, BandError> {
    if band_d <= Decimal::ZERO {
        return Err(BandError::InvalidInput(band_d));
    }
    let nine = Decimal::from(9);
    let mut amounts = [Decimal::ZERO; 8];
    for (amount, band) in amounts.iter_mut().zip(Band::ALL) {
        *amount = band_d
            .checked_mul(Decimal::from(band.ninths()))
            .and_then(|scaled| scaled.checked_div(nine))
            .ok_or(BandError::Overflow(band_d))?;
    }
    Ok(BandAmounts { amounts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn band_d_is_unchanged() {
        for band_d in [dec!(0.01), dec!(200), dec!(1987.43), dec!(2512.99)] {
            let bands = calculate_bands(band_d).unwrap();
            assert_eq!(bands.get(Band::D), band_d);
        }
    }

    #[test]
    fn bands_scaled_from_200() {
        let bands = calculate_bands(dec!(200)).unwrap();
        assert_eq!(bands.get(Band::A).round_dp(2), dec!(133.33));
        assert_eq!(bands.get(Band::B).round_dp(2), dec!(155.56));
        assert_eq!(bands.get(Band::C).round_dp(2), dec!(177.78));
        assert_eq!(bands.get(Band::D), dec!(200));
        assert_eq!(bands.get(Band::E).round_dp(2), dec!(244.44));
        assert_eq!(bands.get(Band::F).round_dp(2), dec!(288.89));
        assert_eq!(bands.get(Band::G).round_dp(2), dec!(333.33));
        assert_eq!(bands.get(Band::H), dec!(400));
    }

    #[test]
    fn each_band_matches_ratio() {
        let band_d = dec!(1843.17);
        let bands = calculate_bands(band_d).unwrap();
        for (band, amount) in bands.iter() {
            let expected = band_d * band.ratio();
            assert!((amount - expected).abs() < dec!(0.000001), "band {band}");
        }
    }

    #[test]
    fn bands_strictly_increasing() {
        let bands = calculate_bands(dec!(0.09)).unwrap();
        let amounts: Vec<_> = bands.iter().map(|(_, a)| a).collect();
        assert!(amounts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert_eq!(
            calculate_bands(Decimal::ZERO),
            Err(BandError::InvalidInput(Decimal::ZERO))
        );
        assert_eq!(
            calculate_bands(dec!(-150)),
            Err(BandError::InvalidInput(dec!(-150)))
        );
    }

    #[test]
    fn oversized_band_d_is_an_error() {
        assert_eq!(
            calculate_bands(Decimal::MAX),
            Err(BandError::Overflow(Decimal::MAX))
        );
        // Band H doubles Band D
        let half = Decimal::MAX / dec!(2);
        assert!(matches!(calculate_bands(half), Err(BandError::Overflow(_))));
    }

    #[test]
    fn band_ratios() {
        assert_eq!(Band::D.ratio(), Decimal::ONE);
        assert_eq!(Band::H.ratio(), dec!(2));
        assert_eq!(Band::ALL.iter().map(|b| b.ninths()).sum::<u32>(), 87);
    }
}
