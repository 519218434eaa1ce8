use serde::Serialize;

/// Punch codes reported by the terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PunchType {
    CheckIn,
    CheckOut,
    BreakOut,
    BreakIn,
    OvertimeIn,
    OvertimeOut,
}

impl PunchType {
    /// Convert device code → enum
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::CheckIn),
            1 => Some(Self::CheckOut),
            2 => Some(Self::BreakOut),
            3 => Some(Self::BreakIn),
            4 => Some(Self::OvertimeIn),
            5 => Some(Self::OvertimeOut),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::CheckIn => 0,
            Self::CheckOut => 1,
            Self::BreakOut => 2,
            Self::BreakIn => 3,
            Self::OvertimeIn => 4,
            Self::OvertimeOut => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CheckIn => "Check-In",
            Self::CheckOut => "Check-Out",
            Self::BreakOut => "Break-Out",
            Self::BreakIn => "Break-In",
            Self::OvertimeIn => "Overtime-In",
            Self::OvertimeOut => "Overtime-Out",
        }
    }

    /// Label for a raw code; unmapped codes render as their decimal value.
    pub fn label_for_code(code: i32) -> String {
        match Self::from_code(code) {
            Some(p) => p.label().to_string(),
            None => code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_labels() {
        let labels: Vec<String> = (0..=5).map(PunchType::label_for_code).collect();
        assert_eq!(
            labels,
            [
                "Check-In",
                "Check-Out",
                "Break-Out",
                "Break-In",
                "Overtime-In",
                "Overtime-Out"
            ]
        );
    }

    #[test]
    fn unknown_codes_render_as_decimal() {
        assert_eq!(PunchType::label_for_code(6), "6");
        assert_eq!(PunchType::label_for_code(255), "255");
        assert_eq!(PunchType::label_for_code(-1), "-1");
    }

    #[test]
    fn code_round_trips() {
        for code in 0..=5 {
            assert_eq!(PunchType::from_code(code).map(|p| p.code()), Some(code));
        }
    }
}
