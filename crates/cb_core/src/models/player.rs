use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a player inside a roster store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Field position (also used as a lineup/box-score label).
///
/// Batted-ball directions 1-9 use the scorer's numbering, so
/// `Position::from_direction(6)` is the shortstop.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Position {
    #[serde(rename = "P")]
    Pitcher,
    #[serde(rename = "C")]
    Catcher,
    #[serde(rename = "1B")]
    FirstBase,
    #[serde(rename = "2B")]
    SecondBase,
    #[serde(rename = "3B")]
    ThirdBase,
    #[serde(rename = "SS")]
    Shortstop,
    #[serde(rename = "LF")]
    LeftField,
    #[serde(rename = "CF")]
    CenterField,
    #[serde(rename = "RF")]
    RightField,
    #[serde(rename = "DH")]
    DesignatedHitter,
    #[serde(rename = "PH")]
    PinchHitter,
    #[serde(rename = "PR")]
    PinchRunner,
    #[default]
    Unknown,
}

impl Position {
    /// Eight defensive positions besides the pitcher, in scorer order.
    pub const FIELDERS: [Position; 8] = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
    ];

    /// 타구 방향(1-9) → 수비 위치
    pub fn from_direction(direction: u8) -> Position {
        match direction {
            1 => Position::Pitcher,
            2 => Position::Catcher,
            3 => Position::FirstBase,
            4 => Position::SecondBase,
            5 => Position::ThirdBase,
            6 => Position::Shortstop,
            7 => Position::LeftField,
            8 => Position::CenterField,
            9 => Position::RightField,
            _ => Position::Unknown,
        }
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(self, Position::Pitcher)
    }

    pub fn is_outfield(&self) -> bool {
        matches!(
            self,
            Position::LeftField | Position::CenterField | Position::RightField
        )
    }

    /// True for positions that take the field (pitcher included).
    pub fn is_defensive(&self) -> bool {
        self.is_pitcher() || Position::FIELDERS.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::PinchHitter => "PH",
            Position::PinchRunner => "PR",
            Position::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bullpen role assigned by the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitcherRole {
    Starter,
    Reliever,
    Closer,
}

/// Roster registration. Only active players take part in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    #[default]
    Active,
    Reserve,
    Injured,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchType {
    pub name: String,
    /// Quality of the pitch; 0 means "unrated" and weighs as 10.
    #[serde(default)]
    pub value: f32,
}

/// Ability ratings. A zero means the rating is unknown; the engine
/// substitutes the league default wherever that matters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Abilities {
    // Batting / running / fielding (0-20 scale)
    pub contact: f32,
    pub power: f32,
    pub speed: f32,
    pub arm: f32,
    pub fielding: f32,
    /// Plate discipline (0-5 scale, 2.5 average)
    pub eye: f32,
    /// Swing aggressiveness (0-5 scale, 2.5 average)
    pub aggressiveness: f32,
    pub bunt: f32,

    // Pitching
    pub control: f32,
    /// Fastball velocity in km/h
    pub velocity: f32,
    pub stamina: f32,
    pub starter_aptitude: f32,
    pub pitch_types: Vec<PitchType>,

    /// Daily fatigue recovery; 0 uses the configured default.
    pub recovery: f32,
    pub overall: f32,
}

impl Abilities {
    /// Replace non-finite or negative ratings with 0 ("unrated").
    pub fn sanitize(&mut self) {
        let ratings = [
            &mut self.contact,
            &mut self.power,
            &mut self.speed,
            &mut self.arm,
            &mut self.fielding,
            &mut self.eye,
            &mut self.aggressiveness,
            &mut self.bunt,
            &mut self.control,
            &mut self.velocity,
            &mut self.stamina,
            &mut self.starter_aptitude,
            &mut self.recovery,
            &mut self.overall,
        ];
        for value in ratings {
            if !value.is_finite() || *value < 0.0 {
                *value = 0.0;
            }
        }
        for pitch in &mut self.pitch_types {
            if !pitch.value.is_finite() || pitch.value < 0.0 {
                pitch.value = 0.0;
            }
        }
    }

    /// Rough batting strength used by lineup building.
    pub fn batting_score(&self) -> f32 {
        self.contact * 1.5 + self.power + self.eye * 0.5
    }
}

/// Defensive aptitude per position group (0-10; 3+ is playable).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aptitudes {
    pub catcher: f32,
    pub first: f32,
    pub second: f32,
    pub third: f32,
    pub short: f32,
    pub outfield: f32,
}

impl Aptitudes {
    /// Aptitude for a fielding position; `None` for P, DH and labels.
    pub fn for_position(&self, position: Position) -> Option<f32> {
        match position {
            Position::Catcher => Some(self.catcher),
            Position::FirstBase => Some(self.first),
            Position::SecondBase => Some(self.second),
            Position::ThirdBase => Some(self.third),
            Position::Shortstop => Some(self.short),
            Position::LeftField | Position::CenterField | Position::RightField => {
                Some(self.outfield)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Primary position on the roster.
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub aptitudes: Aptitudes,
    #[serde(default)]
    pub pitcher_role: Option<PitcherRole>,
    /// Accumulated pitching fatigue (0 = fresh)
    #[serde(default)]
    pub fatigue: f32,
    #[serde(default)]
    pub registration: RegistrationStatus,
    /// Games pitched this season (workload damping for relievers)
    #[serde(default)]
    pub games_pitched: u32,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            position,
            abilities: Abilities::default(),
            aptitudes: Aptitudes::default(),
            pitcher_role: None,
            fatigue: 0.0,
            registration: RegistrationStatus::Active,
            games_pitched: 0,
        }
    }

    pub fn is_pitcher(&self) -> bool {
        self.position.is_pitcher()
    }

    pub fn is_active(&self) -> bool {
        self.registration == RegistrationStatus::Active
    }

    pub fn aptitude_at(&self, position: Position) -> f32 {
        self.aptitudes.for_position(position).unwrap_or(0.0)
    }

    /// Normalise ratings and fatigue in place.
    pub fn sanitize(&mut self) {
        self.abilities.sanitize();
        if !self.fatigue.is_finite() || self.fatigue < 0.0 {
            self.fatigue = 0.0;
        }
    }
}
