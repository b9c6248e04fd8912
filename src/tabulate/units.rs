use clap::ValueEnum;
use std::fmt;

/// Unit system named in the table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Units {
    Lj,
    #[default]
    Real,
    Metal,
    Si,
    Cgs,
    Electron,
    Micro,
    Nano,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Lj => "lj",
            Units::Real => "real",
            Units::Metal => "metal",
            Units::Si => "si",
            Units::Cgs => "cgs",
            Units::Electron => "electron",
            Units::Micro => "micro",
            Units::Nano => "nano",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_names_match_cli_values() {
        for units in Units::value_variants() {
            let parsed = Units::from_str(units.as_str(), false).unwrap();
            assert_eq!(parsed, *units);
        }
        assert_eq!(Units::default().to_string(), "real");
        assert!(Units::from_str("imperial", false).is_err());
    }
}
