//! Player status machine
//!
//! Every temporary status the player can be in is a [`Guard`] phase with a
//! deadline. The tick checks deadlines instead of firing delayed callbacks,
//! so overlapping effects cannot clobber each other's flags.

use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;
use crate::consts::{TIME_MERCY, TIME_RUNNING};
use crate::hud::{COLOR_ARMOR, COLOR_INVINCIBLE, COLOR_MERCY};

/// Protection phase of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Guard {
    /// Bombs hurt
    Vulnerable,
    /// Grace period after losing a life. An `ouch` hit (ground-pounding a
    /// bomb for the first time) is followed by a [`Guard::Lecture`].
    Mercy { until: f64, ouch: bool },
    /// Extended grace while the player is told not to ground pound bombs
    Lecture { until: f64 },
    /// Grace period after armor absorbed a hit
    ArmorMercy { until: f64 },
    /// Brief protection while the bonus-life message shows
    BonusLife { until: f64 },
    /// Invincibility potion or ultimate potion: bombs are destroyed on contact
    PowerUp { kind: PowerUpKind, until: f64 },
}

impl Guard {
    /// Bombs cannot hurt the player
    pub fn invincible(&self) -> bool {
        !matches!(self, Guard::Vulnerable)
    }

    /// Bombs touched by the player are destroyed
    pub fn can_destroy(&self) -> bool {
        matches!(self, Guard::PowerUp { .. })
    }

    /// Protection came from a collected power-up
    pub fn from_powerup(&self) -> bool {
        matches!(self, Guard::PowerUp { .. })
    }

    pub fn deadline(&self) -> Option<f64> {
        match *self {
            Guard::Vulnerable => None,
            Guard::Mercy { until, .. }
            | Guard::Lecture { until }
            | Guard::ArmorMercy { until }
            | Guard::BonusLife { until }
            | Guard::PowerUp { until, .. } => Some(until),
        }
    }
}

/// What happened when a guard phase ran out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardExpiry {
    /// Back to vulnerable
    Recovered,
    /// Ouch mercy ended and the lecture phase began
    Lectured,
    /// A power-up wore off
    PowerUpEnded(PowerUpKind),
}

/// Step the guard past its deadline if `now` has reached it
pub fn expire(guard: &mut Guard, now: f64) -> Option<GuardExpiry> {
    let deadline = guard.deadline()?;
    if now < deadline {
        return None;
    }
    let expiry = match *guard {
        Guard::Mercy { until, ouch: true } => {
            *guard = Guard::Lecture {
                until: until + TIME_MERCY,
            };
            return Some(GuardExpiry::Lectured);
        }
        Guard::PowerUp { kind, .. } => GuardExpiry::PowerUpEnded(kind),
        _ => GuardExpiry::Recovered,
    };
    *guard = Guard::Vulnerable;
    Some(expiry)
}

/// Sprint budget for the shift key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stamina {
    /// Can run; `running_since` is set while shift is held
    Rested { running_since: Option<f64> },
    /// Ran too long and has to walk until `until`
    Tired { until: f64 },
}

impl Default for Stamina {
    fn default() -> Self {
        Stamina::Rested {
            running_since: None,
        }
    }
}

impl Stamina {
    pub fn is_tired(&self) -> bool {
        matches!(self, Stamina::Tired { .. })
    }

    /// Advance with this frame's sprint request. Returns true if the player
    /// runs this frame.
    pub fn update(&mut self, sprint: bool, now: f64) -> bool {
        if let Stamina::Tired { until } = *self {
            if now < until {
                return false;
            }
            *self = Stamina::default();
        }

        if !sprint {
            *self = Stamina::default();
            return false;
        }

        let since = match *self {
            Stamina::Rested {
                running_since: Some(since),
            } => since,
            _ => now,
        };
        if now - since >= TIME_RUNNING {
            log::debug!("Player is tired");
            *self = Stamina::Tired {
                until: now + TIME_RUNNING,
            };
            return false;
        }
        *self = Stamina::Rested {
            running_since: Some(since),
        };
        true
    }
}

/// Fill colour applied to the player sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Tint {
    #[default]
    Clear,
    Fill(u32),
}

/// Armor shows first, then destroy-capable invincibility, then plain mercy
pub fn tint_for(has_armor: bool, guard: &Guard) -> Tint {
    if has_armor {
        Tint::Fill(COLOR_ARMOR)
    } else if guard.invincible() && guard.can_destroy() {
        Tint::Fill(COLOR_INVINCIBLE)
    } else if guard.invincible() {
        Tint::Fill(COLOR_MERCY)
    } else {
        Tint::Clear
    }
}
