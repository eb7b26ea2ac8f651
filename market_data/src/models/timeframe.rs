use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeFrameError {
    #[error("Invalid amount for {unit:?}: {message}")]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },
}

/// Granularity of a bar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
}

/// A bar interval = amount × unit (e.g. 30-Minute, 1-Hour).
///
/// Validation of allowed amounts follows the bars API's rules: 1-59 for
/// minutes, 1-23 for hours, exactly 1 for days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFrame {
    amount: u32,
    unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn minutes(amount: u32) -> Result<Self, TimeFrameError> {
        if !(1..=59).contains(&amount) {
            return Err(TimeFrameError::InvalidAmount {
                unit: TimeFrameUnit::Minute,
                message: "Minute units can only be used with amounts between 1-59.".into(),
            });
        }
        Ok(Self {
            amount,
            unit: TimeFrameUnit::Minute,
        })
    }

    pub fn hours(amount: u32) -> Result<Self, TimeFrameError> {
        if !(1..=23).contains(&amount) {
            return Err(TimeFrameError::InvalidAmount {
                unit: TimeFrameUnit::Hour,
                message: "Hour units can only be used with amounts 1-23".into(),
            });
        }
        Ok(Self {
            amount,
            unit: TimeFrameUnit::Hour,
        })
    }

    /// One hour, the resolution the candle windows are requested at.
    pub const fn hour() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Hour,
        }
    }

    pub const fn day() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Day,
        }
    }

    pub const fn amount(&self) -> u32 {
        self.amount
    }

    pub const fn unit(&self) -> TimeFrameUnit {
        self.unit
    }
}

/// Renders the vendor timeframe code (`30Min`, `1Hour`, `1Day`).
impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeFrameUnit::Minute => "Min",
            TimeFrameUnit::Hour => "Hour",
            TimeFrameUnit::Day => "Day",
        };
        write!(f, "{}{}", self.amount, unit)
    }
}
