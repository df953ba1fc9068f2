use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five working days a record tracks. The set is closed: every day-map
/// carries exactly one flag per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Storage column suffix, e.g. `segunda` in `cafe_segunda`.
    pub const fn column_suffix(self) -> &'static str {
        match self {
            Weekday::Monday => "segunda",
            Weekday::Tuesday => "terca",
            Weekday::Wednesday => "quarta",
            Weekday::Thursday => "quinta",
            Weekday::Friday => "sexta",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda",
            Weekday::Tuesday => "Terça",
            Weekday::Wednesday => "Quarta",
            Weekday::Thursday => "Quinta",
            Weekday::Friday => "Sexta",
        }
    }

    /// Three-letter header used in the table grid.
    pub const fn short_label(self) -> &'static str {
        match self {
            Weekday::Monday => "Seg",
            Weekday::Tuesday => "Ter",
            Weekday::Wednesday => "Qua",
            Weekday::Thursday => "Qui",
            Weekday::Friday => "Sex",
        }
    }
}

/// The two meals tracked independently per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meal {
    Breakfast,
    Lunch,
}

impl Meal {
    /// Breakfast first, then lunch: the fixed column order of the table grid.
    pub const ALL: [Meal; 2] = [Meal::Breakfast, Meal::Lunch];

    pub const fn column_prefix(self) -> &'static str {
        match self {
            Meal::Breakfast => "cafe",
            Meal::Lunch => "almoco",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Meal::Breakfast => "Café da Manhã",
            Meal::Lunch => "Almoço",
        }
    }
}

/// Attendance flags for one meal across the working week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayMap {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
}

impl DayMap {
    /// Build a day-map by asking `f` for every weekday.
    pub fn from_fn(mut f: impl FnMut(Weekday) -> bool) -> Self {
        Self {
            monday: f(Weekday::Monday),
            tuesday: f(Weekday::Tuesday),
            wednesday: f(Weekday::Wednesday),
            thursday: f(Weekday::Thursday),
            friday: f(Weekday::Friday),
        }
    }

    pub const fn get(&self, day: Weekday) -> bool {
        match day {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
        }
    }

    /// Flags in Monday..Friday order.
    pub fn flags(&self) -> [bool; 5] {
        Weekday::ALL.map(|day| self.get(day))
    }
}

/// A stored meal-attendance submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub nome: String,
    pub nome_guerra: String,
    pub graduacao: String,
    pub om: String,
    pub breakfast: DayMap,
    pub lunch: DayMap,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub const fn days(&self, meal: Meal) -> &DayMap {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
        }
    }

    /// All ten flags in grid order: Mon..Fri breakfast, then Mon..Fri lunch.
    pub fn grid_flags(&self) -> [bool; 10] {
        let b = self.breakfast.flags();
        let l = self.lunch.flags();
        [b[0], b[1], b[2], b[3], b[4], l[0], l[1], l[2], l[3], l[4]]
    }
}

/// Submission data before the store assigns an id and timestamp.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewRecord {
    pub nome: String,
    pub nome_guerra: String,
    pub graduacao: String,
    pub om: String,
    pub breakfast: DayMap,
    pub lunch: DayMap,
}

/// Storage shape: one column per (meal, weekday) pair.
/// Field names double as JSON keys (local store) and column names (PostgreSQL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FlatRecord {
    pub id: String,
    #[serde(default)]
    pub nome: String,
    pub nome_guerra: String,
    pub graduacao: String,
    #[serde(default)]
    pub om: String,
    #[serde(default)]
    pub cafe_segunda: bool,
    #[serde(default)]
    pub cafe_terca: bool,
    #[serde(default)]
    pub cafe_quarta: bool,
    #[serde(default)]
    pub cafe_quinta: bool,
    #[serde(default)]
    pub cafe_sexta: bool,
    #[serde(default)]
    pub almoco_segunda: bool,
    #[serde(default)]
    pub almoco_terca: bool,
    #[serde(default)]
    pub almoco_quarta: bool,
    #[serde(default)]
    pub almoco_quinta: bool,
    #[serde(default)]
    pub almoco_sexta: bool,
    pub created_at: DateTime<Utc>,
}

/// Form data from the registration form. Checked day boxes arrive as extra
/// fields named after their storage column; unchecked ones are absent.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub nome_guerra: String,
    #[serde(default)]
    pub graduacao: String,
    #[serde(default)]
    pub om: String,
    pub csrf_token: String,
    #[serde(flatten)]
    pub checked: HashMap<String, String>,
}
