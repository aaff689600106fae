use derive_more::Display;

/// What the client said it did to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Verb {
    #[display("Adding")]
    Adding,
    #[display("Deleting")]
    Deleting,
    #[display("Updating")]
    Updating,
    #[display("Merging")]
    Merging,
    #[display("Conflicting")]
    Conflicting,
    #[display("Replacing")]
    Replacing,
    #[display("Existing")]
    Existing,
    #[display("Sending")]
    Sending,
}

impl Verb {
    /// Decodes the one-letter code printed by checkout and update.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Verb::Adding),
            'D' => Some(Verb::Deleting),
            'U' => Some(Verb::Updating),
            'G' => Some(Verb::Merging),
            'C' => Some(Verb::Conflicting),
            'R' => Some(Verb::Replacing),
            'E' => Some(Verb::Existing),
            _ => None,
        }
    }

    /// Decodes the word printed at the start of a commit or import line.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "Adding" => Some(Verb::Adding),
            "Sending" => Some(Verb::Sending),
            "Deleting" => Some(Verb::Deleting),
            "Replacing" => Some(Verb::Replacing),
            _ => None,
        }
    }
}
