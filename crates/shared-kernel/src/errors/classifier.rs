// crates/shared-kernel/src/errors/classifier.rs

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::errors::ErrorCode;

pub type ErrorPredicate = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

/// What the classifier gets to look at.
#[derive(Clone, Copy)]
pub enum Subject<'a> {
    /// An ordinary local failure, matched by type rules.
    Local(&'a (dyn StdError + 'static)),
    /// A propagation marker and the code it carries so far.
    Marker(Option<&'a ErrorCode>),
    /// A downstream failure and the error name decoded from its trailer.
    Remote(Option<&'a str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: ErrorCode,
    /// Set by terminal type rules: the failure is an expected violation.
    pub terminal: bool,
}

impl Resolution {
    fn plain(code: &ErrorCode) -> Self {
        Self { code: code.clone(), terminal: false }
    }
}

/// One `(predicate, code)` pair of a [`TypeRules`] list.
#[derive(Clone)]
pub struct TypeRule {
    predicate: ErrorPredicate,
    code: ErrorCode,
    terminal: bool,
    label: &'static str,
}

impl TypeRule {
    /// Matches failures whose concrete type is `E`.
    pub fn of<E: StdError + 'static>(code: impl Into<ErrorCode>) -> Self {
        Self {
            predicate: Arc::new(|e: &(dyn StdError + 'static)| e.is::<E>()),
            code: code.into(),
            terminal: false,
            label: std::any::type_name::<E>(),
        }
    }

    /// Matches failures of type `E` accepted by `accept`.
    pub fn matching<E, F>(code: impl Into<ErrorCode>, accept: F) -> Self
    where
        E: StdError + 'static,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(move |e: &(dyn StdError + 'static)| {
                e.downcast_ref::<E>().is_some_and(&accept)
            }),
            code: code.into(),
            terminal: false,
            label: std::any::type_name::<E>(),
        }
    }

    pub fn when<F>(code: impl Into<ErrorCode>, predicate: F) -> Self
    where
        F: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            code: code.into(),
            terminal: false,
            label: "predicate",
        }
    }

    /// A match is an expected violation: the scope raises a domain error
    /// instead of a server failure.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    pub fn matches(&self, error: &(dyn StdError + 'static)) -> bool {
        (self.predicate)(error)
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }
}

impl fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRule")
            .field("matches", &self.label)
            .field("code", &self.code)
            .field("terminal", &self.terminal)
            .finish()
    }
}

/// Type rules evaluated in declaration order, first match wins.
#[derive(Debug, Clone)]
pub struct TypeRules {
    rules: Vec<TypeRule>,
    default: ErrorCode,
}

impl TypeRules {
    pub fn new(default: impl Into<ErrorCode>) -> Self {
        Self { rules: Vec::new(), default: default.into() }
    }

    pub fn on<E: StdError + 'static>(self, code: impl Into<ErrorCode>) -> Self {
        self.rule(TypeRule::of::<E>(code))
    }

    pub fn on_match<E, F>(self, code: impl Into<ErrorCode>, accept: F) -> Self
    where
        E: StdError + 'static,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.rule(TypeRule::matching::<E, F>(code, accept))
    }

    pub fn rule(mut self, rule: TypeRule) -> Self {
        self.rules.push(rule);
        self
    }

    fn classify(&self, subject: Subject<'_>) -> Resolution {
        let matched = match subject {
            Subject::Local(error) => self.rules.iter().find(|rule| rule.matches(error)),
            Subject::Marker(_) | Subject::Remote(_) => None,
        };

        match matched {
            Some(rule) => Resolution { code: rule.code.clone(), terminal: rule.terminal },
            None => Resolution::plain(&self.default),
        }
    }
}

/// Source code → target code map for failures that are already classified.
///
/// Local markers are matched on the full code; names decoded from a
/// downstream trailer carry no domain and are matched on the name only.
#[derive(Debug, Clone)]
pub struct CodeMap {
    entries: Vec<(ErrorCode, ErrorCode)>,
    default: ErrorCode,
}

impl CodeMap {
    pub fn new(default: impl Into<ErrorCode>) -> Self {
        Self { entries: Vec::new(), default: default.into() }
    }

    pub fn map(mut self, from: impl Into<ErrorCode>, to: impl Into<ErrorCode>) -> Self {
        self.entries.push((from.into(), to.into()));
        self
    }

    fn classify(&self, subject: Subject<'_>) -> Resolution {
        let target = match subject {
            Subject::Marker(Some(code)) => self
                .entries
                .iter()
                .find(|(from, _)| from == code)
                .map(|(_, to)| to),
            Subject::Remote(Some(name)) => self
                .entries
                .iter()
                .find(|(from, _)| from.name() == name)
                .map(|(_, to)| to),
            _ => None,
        };

        Resolution::plain(target.unwrap_or(&self.default))
    }
}

/// Rule set of one catch scope. Read-only, cheap to clone and safe to share
/// between concurrent calls.
#[derive(Debug, Clone, Default)]
pub enum ErrorRules {
    /// Leave the failure unclassified.
    #[default]
    None,
    Fixed(ErrorCode),
    ByType(TypeRules),
    ByCode(CodeMap),
}

impl ErrorRules {
    pub fn fixed(code: impl Into<ErrorCode>) -> Self {
        Self::Fixed(code.into())
    }

    /// Pure: same subject and rules always give the same resolution.
    pub fn classify(&self, subject: Subject<'_>) -> Option<Resolution> {
        match self {
            Self::None => None,
            Self::Fixed(code) => Some(Resolution::plain(code)),
            Self::ByType(rules) => Some(rules.classify(subject)),
            Self::ByCode(map) => Some(map.classify(subject)),
        }
    }

    pub fn resolve(&self, subject: Subject<'_>) -> Option<ErrorCode> {
        self.classify(subject).map(|resolution| resolution.code)
    }
}

impl From<TypeRules> for ErrorRules {
    fn from(rules: TypeRules) -> Self {
        Self::ByType(rules)
    }
}

impl From<CodeMap> for ErrorRules {
    fn from(map: CodeMap) -> Self {
        Self::ByCode(map)
    }
}
