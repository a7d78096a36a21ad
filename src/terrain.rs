// src/terrain.rs
use serde::{Deserialize, Serialize};

/// Тип местности клетки шаблона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Terrain {
    Ocean,
    DeepOcean,
    Plain,
    Forest,
    Mountain,
    Hill,
    Desert,
    Swamp,
    /// Неизвестная местность (в том числе добивка коротких строк)
    Unknown,
    /// Всё, что за пределами сетки: непроходимо, регион не назначается
    Void,
}

/// Символ добивки коротких строк шаблона
pub const UNKNOWN_GLYPH: char = '?';

impl Terrain {
    /// Все типы суши в порядке объявления (порядок разрешения ничьих)
    pub const LAND: [Terrain; 6] = [
        Terrain::Plain,
        Terrain::Forest,
        Terrain::Mountain,
        Terrain::Hill,
        Terrain::Desert,
        Terrain::Swamp,
    ];

    #[must_use]
    pub fn from_glyph(glyph: char) -> Option<Self> {
        let terrain = match glyph {
            '~' => Terrain::Ocean,
            '≈' => Terrain::DeepOcean,
            '.' => Terrain::Plain,
            '%' => Terrain::Forest,
            '^' => Terrain::Mountain,
            'n' => Terrain::Hill,
            ':' => Terrain::Desert,
            '&' => Terrain::Swamp,
            UNKNOWN_GLYPH => Terrain::Unknown,
            _ => return None,
        };
        Some(terrain)
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Terrain::Ocean => '~',
            Terrain::DeepOcean => '≈',
            Terrain::Plain => '.',
            Terrain::Forest => '%',
            Terrain::Mountain => '^',
            Terrain::Hill => 'n',
            Terrain::Desert => ':',
            Terrain::Swamp => '&',
            Terrain::Unknown => UNKNOWN_GLYPH,
            Terrain::Void => ' ',
        }
    }

    #[must_use]
    pub fn is_land(self) -> bool {
        Self::LAND.contains(&self)
    }

    #[must_use]
    pub fn is_sea(self) -> bool {
        matches!(self, Terrain::Ocean | Terrain::DeepOcean)
    }

    /// Стоимость перехода (в днях) для дорог; у воды и неизвестного её нет
    #[must_use]
    pub fn move_cost(self) -> Option<u32> {
        match self {
            Terrain::Plain | Terrain::Desert => Some(1),
            Terrain::Forest | Terrain::Hill => Some(2),
            Terrain::Swamp => Some(3),
            Terrain::Mountain => Some(4),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip_for_template_terrain() {
        for glyph in ['~', '≈', '.', '%', '^', 'n', ':', '&', '?'] {
            let terrain = Terrain::from_glyph(glyph).unwrap();
            assert_eq!(terrain.glyph(), glyph);
        }
        assert_eq!(Terrain::from_glyph('X'), None);
    }

    #[test]
    fn land_and_sea_are_disjoint() {
        assert!(Terrain::Plain.is_land());
        assert!(!Terrain::Plain.is_sea());
        assert!(Terrain::DeepOcean.is_sea());
        assert!(!Terrain::Unknown.is_land() && !Terrain::Unknown.is_sea());
        assert!(!Terrain::Void.is_land() && !Terrain::Void.is_sea());
        assert_eq!(Terrain::Ocean.move_cost(), None);
    }
}
