//! Mapping between the nested day-maps used by views and the ten flat
//! boolean columns used by storage.

use super::types::{DayMap, FlatRecord, Meal, NewRecord, Record, RecordForm, Weekday};

/// Storage column for one (meal, weekday) pair, e.g. `almoco_quinta`.
pub const fn column(meal: Meal, day: Weekday) -> &'static str {
    match (meal, day) {
        (Meal::Breakfast, Weekday::Monday) => "cafe_segunda",
        (Meal::Breakfast, Weekday::Tuesday) => "cafe_terca",
        (Meal::Breakfast, Weekday::Wednesday) => "cafe_quarta",
        (Meal::Breakfast, Weekday::Thursday) => "cafe_quinta",
        (Meal::Breakfast, Weekday::Friday) => "cafe_sexta",
        (Meal::Lunch, Weekday::Monday) => "almoco_segunda",
        (Meal::Lunch, Weekday::Tuesday) => "almoco_terca",
        (Meal::Lunch, Weekday::Wednesday) => "almoco_quarta",
        (Meal::Lunch, Weekday::Thursday) => "almoco_quinta",
        (Meal::Lunch, Weekday::Friday) => "almoco_sexta",
    }
}

/// Flatten one meal's day-map into its five `(column, flag)` pairs.
pub fn flatten(days: &DayMap, meal: Meal) -> [(&'static str, bool); 5] {
    Weekday::ALL.map(|day| (column(meal, day), days.get(day)))
}

/// Rebuild one meal's day-map from a flat record.
pub fn unflatten(flat: &FlatRecord, meal: Meal) -> DayMap {
    DayMap::from_fn(|day| flat.flag(meal, day))
}

impl FlatRecord {
    pub const fn flag(&self, meal: Meal, day: Weekday) -> bool {
        match (meal, day) {
            (Meal::Breakfast, Weekday::Monday) => self.cafe_segunda,
            (Meal::Breakfast, Weekday::Tuesday) => self.cafe_terca,
            (Meal::Breakfast, Weekday::Wednesday) => self.cafe_quarta,
            (Meal::Breakfast, Weekday::Thursday) => self.cafe_quinta,
            (Meal::Breakfast, Weekday::Friday) => self.cafe_sexta,
            (Meal::Lunch, Weekday::Monday) => self.almoco_segunda,
            (Meal::Lunch, Weekday::Tuesday) => self.almoco_terca,
            (Meal::Lunch, Weekday::Wednesday) => self.almoco_quarta,
            (Meal::Lunch, Weekday::Thursday) => self.almoco_quinta,
            (Meal::Lunch, Weekday::Friday) => self.almoco_sexta,
        }
    }

    /// Set a flag by column name. Unknown names are ignored.
    pub fn set_column(&mut self, name: &str, value: bool) {
        let slot = match name {
            "cafe_segunda" => &mut self.cafe_segunda,
            "cafe_terca" => &mut self.cafe_terca,
            "cafe_quarta" => &mut self.cafe_quarta,
            "cafe_quinta" => &mut self.cafe_quinta,
            "cafe_sexta" => &mut self.cafe_sexta,
            "almoco_segunda" => &mut self.almoco_segunda,
            "almoco_terca" => &mut self.almoco_terca,
            "almoco_quarta" => &mut self.almoco_quarta,
            "almoco_quinta" => &mut self.almoco_quinta,
            "almoco_sexta" => &mut self.almoco_sexta,
            _ => return,
        };
        *slot = value;
    }
}

impl From<&Record> for FlatRecord {
    fn from(record: &Record) -> Self {
        let mut flat = FlatRecord {
            id: record.id.clone(),
            nome: record.nome.clone(),
            nome_guerra: record.nome_guerra.clone(),
            graduacao: record.graduacao.clone(),
            om: record.om.clone(),
            cafe_segunda: false,
            cafe_terca: false,
            cafe_quarta: false,
            cafe_quinta: false,
            cafe_sexta: false,
            almoco_segunda: false,
            almoco_terca: false,
            almoco_quarta: false,
            almoco_quinta: false,
            almoco_sexta: false,
            created_at: record.created_at,
        };
        for meal in Meal::ALL {
            for (name, value) in flatten(record.days(meal), meal) {
                flat.set_column(name, value);
            }
        }
        flat
    }
}

impl From<FlatRecord> for Record {
    fn from(flat: FlatRecord) -> Self {
        let breakfast = unflatten(&flat, Meal::Breakfast);
        let lunch = unflatten(&flat, Meal::Lunch);
        Record {
            id: flat.id,
            nome: flat.nome,
            nome_guerra: flat.nome_guerra,
            graduacao: flat.graduacao,
            om: flat.om,
            breakfast,
            lunch,
            created_at: flat.created_at,
        }
    }
}

impl RecordForm {
    /// Trimmed candidate record; a day is attended when its checkbox was sent.
    pub fn to_new_record(&self) -> NewRecord {
        let checked = |meal: Meal| DayMap::from_fn(|day| self.checked.contains_key(column(meal, day)));
        NewRecord {
            nome: self.nome.trim().to_string(),
            nome_guerra: self.nome_guerra.trim().to_string(),
            graduacao: self.graduacao.trim().to_string(),
            om: self.om.trim().to_string(),
            breakfast: checked(Meal::Breakfast),
            lunch: checked(Meal::Lunch),
        }
    }
}
