use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::Character;
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

pub const COUP_COST: u8 = 7;
pub const ASSASSINATE_COST: u8 = 3;
pub const FORCED_COUP_COINS: u8 = 10;
pub const MAX_STEAL: u8 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Exchange,
    Steal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionRules {
    pub cost: u8,
    pub claim: Option<Character>,
    pub blocked_by: &'static [Character],
    /// Whether any opponent may block, rather than only the target.
    pub blockable_by_anyone: bool,
    pub targeted: bool,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Income,
        Action::ForeignAid,
        Action::Coup,
        Action::Tax,
        Action::Assassinate,
        Action::Exchange,
        Action::Steal,
    ];

    pub const fn rules(self) -> ActionRules {
        match self {
            Action::Income => ActionRules {
                cost: 0,
                claim: None,
                blocked_by: &[],
                blockable_by_anyone: false,
                targeted: false,
            },
            Action::ForeignAid => ActionRules {
                cost: 0,
                claim: None,
                blocked_by: &[Duke],
                blockable_by_anyone: true,
                targeted: false,
            },
            Action::Coup => ActionRules {
                cost: COUP_COST,
                claim: None,
                blocked_by: &[],
                blockable_by_anyone: false,
                targeted: true,
            },
            Action::Tax => ActionRules {
                cost: 0,
                claim: Some(Duke),
                blocked_by: &[],
                blockable_by_anyone: false,
                targeted: false,
            },
            Action::Assassinate => ActionRules {
                cost: ASSASSINATE_COST,
                claim: Some(Assassin),
                blocked_by: &[Contessa],
                blockable_by_anyone: false,
                targeted: true,
            },
            Action::Exchange => ActionRules {
                cost: 0,
                claim: Some(Ambassador),
                blocked_by: &[],
                blockable_by_anyone: false,
                targeted: false,
            },
            Action::Steal => ActionRules {
                cost: 0,
                claim: Some(Captain),
                blocked_by: &[Captain, Ambassador],
                blockable_by_anyone: false,
                targeted: true,
            },
        }
    }

    pub fn cost(self) -> u8 {
        self.rules().cost
    }

    pub fn claim(self) -> Option<Character> {
        self.rules().claim
    }

    pub fn blocked_by(self) -> &'static [Character] {
        self.rules().blocked_by
    }

    pub fn is_targeted(self) -> bool {
        self.rules().targeted
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Income => "Income",
            Action::ForeignAid => "Foreign Aid",
            Action::Coup => "Coup",
            Action::Tax => "Tax",
            Action::Assassinate => "Assassinate",
            Action::Exchange => "Exchange",
            Action::Steal => "Steal",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Action::Income => "Income (take 1 coin)",
            Action::ForeignAid => "Foreign Aid (take 2 coins, blockable by Duke)",
            Action::Coup => "Coup (pay 7 coins, target loses an influence)",
            Action::Tax => "Tax (Duke - take 3 coins)",
            Action::Assassinate => "Assassinate (Assassin - pay 3 coins, target loses an influence)",
            Action::Exchange => "Exchange (Ambassador - exchange cards with the deck)",
            Action::Steal => "Steal (Captain - take 2 coins from another player)",
        }
    }

    /// Actions a player holding `coins` may choose. Only Coup at 10 or more.
    pub fn affordable(coins: u8) -> Vec<Action> {
        if coins >= FORCED_COUP_COINS {
            return vec![Action::Coup];
        }

        Action::ALL
            .iter()
            .copied()
            .filter(|action| action.cost() <= coins)
            .collect()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Income => f.write_str("take Income"),
            Action::ForeignAid => f.write_str("take Foreign Aid"),
            Action::Coup => f.write_str("launch a Coup"),
            Action::Tax => f.write_str("collect Tax"),
            Action::Assassinate => f.write_str("assassinate"),
            Action::Exchange => f.write_str("exchange cards"),
            Action::Steal => f.write_str("steal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::Character::{Ambassador, Captain, Contessa, Duke};

    #[test]
    fn affordability() {
        assert_eq!(Action::affordable(0), vec![Action::Income, Action::ForeignAid, Action::Tax, Action::Exchange, Action::Steal]);
        assert!(Action::affordable(3).contains(&Action::Assassinate));
        assert!(!Action::affordable(6).contains(&Action::Coup));
        assert!(Action::affordable(7).contains(&Action::Coup));
        assert_eq!(Action::affordable(10), vec![Action::Coup]);
        assert_eq!(Action::affordable(12), vec![Action::Coup]);
    }

    #[test]
    fn table() {
        assert_eq!(Action::Tax.claim(), Some(Duke));
        assert_eq!(Action::Coup.claim(), None);
        assert_eq!(Action::Assassinate.blocked_by(), &[Contessa]);
        assert_eq!(Action::Steal.blocked_by(), &[Captain, Ambassador]);
        assert!(Action::ForeignAid.rules().blockable_by_anyone);
        assert!(Action::Income.blocked_by().is_empty());

        let targeted: Vec<Action> = Action::ALL.iter().copied().filter(|a| a.is_targeted()).collect();
        assert_eq!(targeted, vec![Action::Coup, Action::Assassinate, Action::Steal]);
    }
}
