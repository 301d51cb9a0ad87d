use std::fmt;

use super::Value;

/// Comparison operators supported in rule conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A single test of one field path against a literal.
///
/// `Equality` is the bare shorthand (`clause.type: indemnity`): the resolved
/// value must equal the literal exactly, no coercion. `Comparison` is the
/// operator form (`clause.normalized.amount: ">= 100000"`): the literal text is
/// coerced against the resolved value before comparing.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTest {
    Equality {
        path: String,
        literal: Value,
    },
    Comparison {
        path: String,
        op: CompareOp,
        literal: String,
    },
}

/// A flat, implicitly ANDed set of field tests. Groups cannot nest `any`/`all`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    tests: Vec<FieldTest>,
}

/// One entry of a rule's `when`. A rule matches when all of its conditions do.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Test(FieldTest),
    /// Matches when at least one group fully matches. No groups never matches.
    AnyOf(Vec<ConditionGroup>),
    /// Matches when every group fully matches. No groups always matches.
    AllOf(Vec<ConditionGroup>),
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for FieldTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTest::Equality { path, literal } => write!(f, "{path} is {literal}"),
            FieldTest::Comparison { path, op, literal } => write!(f, "{path} {op} {literal}"),
        }
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, test) in self.tests.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{test}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, groups) = match self {
            Condition::Test(test) => return write!(f, "{test}"),
            Condition::AnyOf(groups) => ("ANY", groups),
            Condition::AllOf(groups) => ("ALL", groups),
        };
        write!(f, "{name}[")?;
        for (i, group) in groups.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{group}")?;
        }
        write!(f, "]")
    }
}

impl FieldTest {
    /// The dotted path this test resolves.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            FieldTest::Equality { path, .. } | FieldTest::Comparison { path, .. } => path,
        }
    }
}

impl ConditionGroup {
    #[must_use]
    pub fn new(tests: Vec<FieldTest>) -> Self {
        Self { tests }
    }

    #[must_use]
    pub fn tests(&self) -> &[FieldTest] {
        &self.tests
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl From<FieldTest> for Condition {
    fn from(test: FieldTest) -> Self {
        Condition::Test(test)
    }
}

/// Intermediate builder for field tests.
/// Created by [`field()`]; requires a comparison method to produce a [`FieldTest`].
///
/// Operator methods take the literal as rule text, exactly as it would appear
/// after the operator in a rule document.
#[derive(Debug, Clone)]
pub struct FieldExpr {
    path: String,
}

impl FieldExpr {
    /// Bare equality against a typed literal.
    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> FieldTest {
        FieldTest::Equality {
            path: self.path,
            literal: value.into(),
        }
    }

    #[must_use]
    pub fn compare(self, op: CompareOp, literal: &str) -> FieldTest {
        FieldTest::Comparison {
            path: self.path,
            op,
            literal: literal.trim().to_owned(),
        }
    }

    /// `==` with a coerced literal, as opposed to the bare [`eq`](Self::eq).
    #[must_use]
    pub fn equals(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Eq, literal)
    }

    #[must_use]
    pub fn neq(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Neq, literal)
    }

    #[must_use]
    pub fn gt(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Gt, literal)
    }

    #[must_use]
    pub fn gte(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Gte, literal)
    }

    #[must_use]
    pub fn lt(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Lt, literal)
    }

    #[must_use]
    pub fn lte(self, literal: &str) -> FieldTest {
        self.compare(CompareOp::Lte, literal)
    }
}

#[must_use]
pub fn field(path: &str) -> FieldExpr {
    FieldExpr {
        path: path.to_owned(),
    }
}

#[must_use]
pub fn group(tests: impl IntoIterator<Item = FieldTest>) -> ConditionGroup {
    ConditionGroup::new(tests.into_iter().collect())
}

#[must_use]
pub fn any_of(groups: impl IntoIterator<Item = ConditionGroup>) -> Condition {
    Condition::AnyOf(groups.into_iter().collect())
}

#[must_use]
pub fn all_of(groups: impl IntoIterator<Item = ConditionGroup>) -> Condition {
    Condition::AllOf(groups.into_iter().collect())
}
