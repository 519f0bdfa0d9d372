use serde::Serialize;
use strum::Display;

/// Grammar productions the compiler walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Class,
    ClassVarDec,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    ExpressionList,
}

/// Observer notified as productions start and finish.
pub trait Hook {
    fn enter(&mut self, _rule: Rule) {}
    fn leave(&mut self, _rule: Rule) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Enter(Rule),
    Leave(Rule),
}

/// Flat record of production boundaries, in walk order.
#[derive(Debug, Default, Serialize)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in the order they were entered.
    pub fn entered(&self) -> Vec<Rule> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Enter(rule) => Some(*rule),
                Event::Leave(_) => None,
            })
            .collect()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl Hook for Recorder {
    fn enter(&mut self, rule: Rule) {
        self.events.push(Event::Enter(rule));
    }

    fn leave(&mut self, rule: Rule) {
        self.events.push(Event::Leave(rule));
    }
}
