/// Request/response shapes for a network or JSON front-end.
///
/// Field names follow the HTTP contract (`itemA`, `sortedList`, ...). The
/// types are plain data; serde derives are enabled with the `serde` feature.
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{Item, Next, Pair, SessionId};

/// Which of the two presented items the human picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The first item shown (`itemA`).
    A,
    /// The second item shown (`itemB`).
    B,
}

impl Choice {
    /// Split the pending pair into `(winner, loser)` for this choice.
    pub fn resolve(self, pair: &Pair) -> (&str, &str) {
        match self {
            Choice::A => (pair.a.as_str(), pair.b.as_str()),
            Choice::B => (pair.b.as_str(), pair.a.as_str()),
        }
    }
}

impl FromStr for Choice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" | "a" => Ok(Choice::A),
            "B" | "b" => Ok(Choice::B),
            other => Err(Error::InvalidChoice(format!(
                "choice must be \"A\" or \"B\", got \"{other}\""
            ))),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::A => f.write_str("A"),
            Choice::B => f.write_str("B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StartRequest {
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StartResponse {
    pub session_id: SessionId,
}

/// Body of a choice submission. `choice` stays a string so that anything
/// other than "A"/"B" surfaces as `InvalidChoice` rather than a decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceRequest {
    pub choice: String,
}

impl ChoiceRequest {
    pub fn choice(&self) -> Result<Choice> {
        self.choice.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(untagged, rename_all_fields = "camelCase")
)]
pub enum NextResponse {
    Compare { item_a: Item, item_b: Item },
    Done { done: bool, sorted_list: Vec<Item> },
}

impl From<Next> for NextResponse {
    fn from(next: Next) -> Self {
        match next {
            Next::Compare { item_a, item_b } => NextResponse::Compare { item_a, item_b },
            Next::Done { sorted } => NextResponse::Done {
                done: true,
                sorted_list: sorted,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceResponse {
    pub accepted: bool,
    pub next: NextResponse,
}

impl ChoiceResponse {
    pub fn accepted(next: Next) -> Self {
        ChoiceResponse {
            accepted: true,
            next: next.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ResultResponse {
    pub sorted_list: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
        }
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("A".parse::<Choice>().unwrap(), Choice::A);
        assert_eq!("b".parse::<Choice>().unwrap(), Choice::B);
        assert_eq!(" B ".parse::<Choice>().unwrap(), Choice::B);
    }

    #[test]
    fn test_parse_choice_rejects_other_letters() {
        assert!(matches!("C".parse::<Choice>(), Err(Error::InvalidChoice(_))));
        assert!(matches!("".parse::<Choice>(), Err(Error::InvalidChoice(_))));
        assert!(matches!("AB".parse::<Choice>(), Err(Error::InvalidChoice(_))));
    }

    #[test]
    fn test_choice_resolve() {
        let pair = Pair {
            a: "x".to_string(),
            b: "y".to_string(),
        };
        assert_eq!(Choice::A.resolve(&pair), ("x", "y"));
        assert_eq!(Choice::B.resolve(&pair), ("y", "x"));
    }

    #[test]
    fn test_done_response_sets_flag() {
        let response = NextResponse::from(Next::Done {
            sorted: vec![item("a")],
        });
        assert_eq!(
            response,
            NextResponse::Done {
                done: true,
                sorted_list: vec![item("a")]
            }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_next_response_json_shape() {
        let compare = NextResponse::from(Next::Compare {
            item_a: item("a"),
            item_b: item("b"),
        });
        let json = serde_json::to_value(&compare).unwrap();
        assert_eq!(json["itemA"]["id"], "a");
        assert_eq!(json["itemB"]["title"], "B");

        let done = ChoiceResponse::accepted(Next::Done {
            sorted: vec![item("b"), item("a")],
        });
        let json = serde_json::to_value(&done).unwrap();
        assert_eq!(json["accepted"], true);
        assert_eq!(json["next"]["done"], true);
        assert_eq!(json["next"]["sortedList"][0]["id"], "b");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_choice_request_with_bad_letter() {
        let request: ChoiceRequest = serde_json::from_str(r#"{"choice": "C"}"#).unwrap();
        assert!(matches!(request.choice(), Err(Error::InvalidChoice(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_start_request_field_names() {
        let request: StartRequest = serde_json::from_str(r#"{"itemIds": ["x", "y"]}"#).unwrap();
        assert_eq!(request.item_ids, vec!["x", "y"]);
    }
}
