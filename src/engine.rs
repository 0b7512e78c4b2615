//! The backtracking top-down parsing automaton.
//!
//! The engine walks a four-state machine over a pair of stacks:
//!
//! - the *working stack* records every decision taken so far — consumed
//!   terminals and chosen alternatives — in left-to-right derivation order;
//! - the *input stack* holds the predicted, not-yet-matched frontier of
//!   symbols, leftmost pending symbol first.
//!
//! Each [`ParserEngine::step`] evaluates exactly one transition rule. On
//! acceptance the working stack *is* the parse trace handed to the tree
//! builder; on rejection the index at the moment `Error` was entered is the
//! reported failing position.
//!
//! Backtracking is ordinary control flow here, never an error path.

use std::collections::VecDeque;
use std::fmt;

use crate::errors::DescentError;
use crate::grammar::Grammar;
use crate::trace::TraceSink;

/// Automaton state. `Final` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// `q` — normal state, deriving and matching.
    Normal,
    /// `b` — back state, undoing the most recent decision.
    Back,
    /// `f` — success.
    Final,
    /// `e` — rejection.
    Error,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            State::Normal => "q",
            State::Back => "b",
            State::Final => "f",
            State::Error => "e",
        };
        write!(f, "{letter}")
    }
}

/// One recorded decision on the working stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    /// A matched input token.
    Terminal(String),
    /// A chosen alternative for a non-terminal.
    Expansion {
        non_terminal: String,
        /// The global alternative id (see `grammar::Alternative`).
        alternative: usize,
    },
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackEntry::Terminal(value) => write!(f, "{value}"),
            StackEntry::Expansion {
                non_terminal,
                alternative,
            } => write!(f, "({non_terminal}, {alternative})"),
        }
    }
}

/// The complete mutable state of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub state: State,
    /// Position of the current symbol in the input sequence.
    /// Invariant: `0 <= index <= sequence length`.
    pub index: usize,
    pub working_stack: Vec<StackEntry>,
    pub input_stack: VecDeque<String>,
}

impl Configuration {
    /// The initial configuration: normal state, index 0, empty working
    /// stack, input stack holding only the start symbol.
    pub fn initial(start_symbol: &str) -> Self {
        Self {
            state: State::Normal,
            index: 0,
            working_stack: Vec::new(),
            input_stack: VecDeque::from([start_symbol.to_string()]),
        }
    }

    /// Fabricates an arbitrary mid-parse configuration.
    ///
    /// Reserved for test harnesses that need to drive single transitions from
    /// a synthetic state. Production callers should go through
    /// [`ParserEngine::new`], which cannot violate the configuration
    /// invariants.
    pub fn from_raw_parts<I>(
        state: State,
        index: usize,
        working_stack: Vec<StackEntry>,
        input_stack: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            state,
            index,
            working_stack,
            input_stack: input_stack.into_iter().collect(),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State: {} Index: {}", self.state, self.index)?;
        write!(f, "\nWorking stack: [")?;
        for (i, entry) in self.working_stack.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, "]\nInput stack: [")?;
        for (i, symbol) in self.input_stack.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol}")?;
        }
        write!(f, "]")
    }
}

/// The result of a finished engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The sequence derives from the start symbol. `trace` is the final
    /// working-stack content in left-to-right order.
    Accepted { trace: Vec<StackEntry> },
    /// The sequence does not derive. `index` is the failing position.
    Rejected { index: usize },
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParseOutcome::Accepted { .. })
    }
}

/// One parse run: borrows the grammar read-only, exclusively owns its
/// sequence and configuration.
pub struct ParserEngine<'g> {
    grammar: &'g Grammar,
    sequence: Vec<String>,
    configuration: Configuration,
}

impl<'g> ParserEngine<'g> {
    pub fn new(grammar: &'g Grammar, sequence: Vec<String>) -> Self {
        let configuration = Configuration::initial(grammar.start_symbol());
        Self {
            grammar,
            sequence,
            configuration,
        }
    }

    /// Starts from a fabricated configuration. Test-harness entry point; see
    /// [`Configuration::from_raw_parts`].
    pub fn from_raw_parts(
        grammar: &'g Grammar,
        sequence: Vec<String>,
        configuration: Configuration,
    ) -> Self {
        Self {
            grammar,
            sequence,
            configuration,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// Runs the automaton to completion.
    ///
    /// Immediately before evaluating each step, a snapshot of the full
    /// configuration is appended to the trace sink; the sink is write-only
    /// and never influences a parsing decision. A sink I/O failure is fatal
    /// and surfaces as `DescentError::Io`.
    ///
    /// Termination is a property of the grammar, not of the engine: a
    /// grammar whose retry chain never shrinks the problem (for example a
    /// left-recursive rule that consumes no input) makes this loop run
    /// forever. No step or depth bound is imposed.
    pub fn run(&mut self, sink: &mut dyn TraceSink) -> Result<ParseOutcome, DescentError> {
        while !matches!(self.configuration.state, State::Final | State::Error) {
            sink.snapshot(&self.configuration)
                .map_err(|e| DescentError::io("trace sink", e))?;
            self.step(sink)?;
        }

        match self.configuration.state {
            State::Final => {
                let trace = self.configuration.working_stack.clone();
                sink.note(&format!("Sequence {:?} is accepted!", self.sequence))
                    .map_err(|e| DescentError::io("trace sink", e))?;
                Ok(ParseOutcome::Accepted { trace })
            }
            _ => {
                let index = self.configuration.index;
                sink.note(&format!("Error at index {index}!"))
                    .map_err(|e| DescentError::io("trace sink", e))?;
                Ok(ParseOutcome::Rejected { index })
            }
        }
    }

    /// Evaluates exactly one transition rule, chosen by the current state
    /// and configuration. A no-op in `Final` or `Error`.
    pub fn step(&mut self, sink: &mut dyn TraceSink) -> Result<(), DescentError> {
        match self.configuration.state {
            State::Normal => {
                let frontier_empty = self.configuration.input_stack.is_empty();
                let at_end = self.configuration.index == self.sequence.len();
                if at_end && frontier_empty {
                    self.trace_action(sink, "success")?;
                    self.success();
                } else if frontier_empty {
                    // Sequence too long and genuine derivation dead ends are
                    // deliberately not distinguished here.
                    self.trace_action(sink, "momentary insuccess")?;
                    self.momentary_insuccess();
                } else if self
                    .grammar
                    .is_non_terminal(&self.configuration.input_stack[0])
                {
                    self.trace_action(sink, "expand")?;
                    self.expand()?;
                } else if self.configuration.index < self.sequence.len()
                    && self.configuration.input_stack[0] == self.sequence[self.configuration.index]
                {
                    self.trace_action(sink, "advance")?;
                    self.advance();
                } else {
                    self.trace_action(sink, "momentary insuccess")?;
                    self.momentary_insuccess();
                }
            }
            State::Back => match self.configuration.working_stack.last() {
                Some(StackEntry::Terminal(_)) => {
                    self.trace_action(sink, "back")?;
                    self.back()?;
                }
                Some(StackEntry::Expansion { .. }) => {
                    self.trace_action(sink, "another try")?;
                    self.another_try()?;
                }
                None => {
                    return Err(DescentError::internal(
                        "back state with an empty working stack",
                    ));
                }
            },
            State::Final | State::Error => {}
        }
        Ok(())
    }

    fn trace_action(&self, sink: &mut dyn TraceSink, action: &str) -> Result<(), DescentError> {
        sink.note(action)
            .map_err(|e| DescentError::io("trace sink", e))
    }

    /// Success: sequence fully consumed and nothing left to derive.
    fn success(&mut self) {
        self.configuration.state = State::Final;
    }

    /// Momentary insuccess: the current path cannot continue; switch to the
    /// back state so the most recent decision gets undone.
    fn momentary_insuccess(&mut self) {
        self.configuration.state = State::Back;
    }

    /// Expand: replace the non-terminal at the head of the input stack with
    /// its first (lowest-id) alternative, recording the choice.
    fn expand(&mut self) -> Result<(), DescentError> {
        let non_terminal = self
            .configuration
            .input_stack
            .pop_front()
            .ok_or_else(|| DescentError::internal("expand on an empty input stack"))?;
        let first = self
            .grammar
            .alternatives_for(&non_terminal)
            .first()
            .ok_or_else(|| {
                DescentError::internal(format!("non-terminal `{non_terminal}` has no alternatives"))
            })?;
        let first_id = first.id;
        let rhs = first.rhs.clone();
        self.configuration.working_stack.push(StackEntry::Expansion {
            non_terminal,
            alternative: first_id,
        });
        self.splice_front(&rhs);
        Ok(())
    }

    /// Advance: the head of the input stack matches the current input token.
    fn advance(&mut self) {
        if let Some(value) = self.configuration.input_stack.pop_front() {
            self.configuration
                .working_stack
                .push(StackEntry::Terminal(value));
            self.configuration.index += 1;
        }
    }

    /// Back: undo the most recent terminal match, returning the token to the
    /// frontier and stepping the index back.
    fn back(&mut self) -> Result<(), DescentError> {
        let Some(StackEntry::Terminal(value)) = self.configuration.working_stack.pop() else {
            return Err(DescentError::internal("back without a matched terminal"));
        };
        if self.configuration.index == 0 {
            return Err(DescentError::internal("back would move the index below 0"));
        }
        self.configuration.input_stack.push_front(value);
        self.configuration.index -= 1;
        Ok(())
    }

    /// Another try: the most recent decision was an expansion. Undo its
    /// pending frontier, then move to the next alternative if one exists,
    /// reject outright if we are back at the root with no input consumed, or
    /// propagate the failure one level up.
    fn another_try(&mut self) -> Result<(), DescentError> {
        let Some(StackEntry::Expansion {
            non_terminal,
            alternative,
        }) = self.configuration.working_stack.pop()
        else {
            return Err(DescentError::internal("another try without an expansion"));
        };

        let current = self
            .grammar
            .alternative_at(&non_terminal, alternative)
            .ok_or_else(|| {
                DescentError::internal(format!(
                    "unknown alternative {alternative} for `{non_terminal}`"
                ))
            })?;
        // Undo the still-pending frontier of the failed expansion.
        let undo = current.rhs.len();
        for _ in 0..undo {
            self.configuration.input_stack.pop_front();
        }

        if let Some(next) = self.grammar.next_alternative(&non_terminal, alternative) {
            let next_id = next.id;
            let rhs = next.rhs.clone();
            self.configuration.working_stack.push(StackEntry::Expansion {
                non_terminal,
                alternative: next_id,
            });
            self.splice_front(&rhs);
            self.configuration.state = State::Normal;
        } else if self.configuration.index == 0 && non_terminal == self.grammar.start_symbol() {
            // All alternatives exhausted at the root with no input consumed:
            // total rejection.
            self.configuration.state = State::Error;
        } else {
            self.configuration.input_stack.push_front(non_terminal);
        }
        Ok(())
    }

    /// Splices a right-hand side onto the front of the input stack,
    /// preserving left-to-right order.
    fn splice_front(&mut self, rhs: &[String]) {
        for symbol in rhs.iter().rev() {
            self.configuration.input_stack.push_front(symbol.clone());
        }
    }
}
