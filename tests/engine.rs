//! Integration tests for indenta-engine crate.

use std::time::Duration;

use indenta_common::{LanguageId, OffsetRanges, Span, Token};
use indenta_engine::{
    CodeBlock, IndentCommand, IndentConfig, IndentDocument, IndentError, IndentMode,
    IndentRequest, IndentResult, IndentStrategy, JoinedTokens, LanguageIndenter, LineContext,
    PassObserver, Phase, Reindenter, TextDocument, TokenSequence,
};
use indenta_lang::ScriptIndenter;
use indenta_lexer::{lex_script, ScriptKind};

const JS: LanguageId = LanguageId::new("js");

fn script_pass(text: &str) -> LanguageIndenter<ScriptIndenter> {
    let blocks = vec![CodeBlock::single(TokenSequence::new(JS, lex_script(text, 0)))];
    LanguageIndenter::new(ScriptIndenter::new(JS), blocks)
}

fn reindent(text: &str, config: IndentConfig, mode: IndentMode) -> String {
    let mut doc = TextDocument::new(text);
    let request = IndentRequest::whole(doc.len(), mode);
    Reindenter::new(config)
        .with_pass(script_pass(text))
        .reindent(&mut doc, &JS, request)
        .unwrap();
    doc.into_string()
}

#[test]
fn test_indent_and_return() {
    let config = IndentConfig::new().indent_width(2);
    assert_eq!(
        reindent("if (a) {\nsomething();\n}", config, IndentMode::Reformat),
        "if (a) {\n  something();\n}"
    );
}

#[test]
fn test_outcome_reports_line_indentation() {
    let text = "if (a) {\nsomething();\n}";
    let mut doc = TextDocument::new(text);
    let outcome = Reindenter::new(IndentConfig::new().indent_width(2))
        .with_pass(script_pass(text))
        .reindent(&mut doc, &JS, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();
    assert_eq!(outcome.indentation_of(0), Some(0));
    assert_eq!(outcome.indentation_of(1), Some(2));
    assert_eq!(outcome.indentation_of(2), Some(0));
    assert_eq!(outcome.edits.len(), 1);
}

#[test]
fn test_reindent_is_idempotent() {
    let text = "function f(a,\nb) {\nif (a) {\nreturn [\n1,\n2,\n];\n}\n}\n";
    let once = reindent(text, IndentConfig::new(), IndentMode::Reformat);

    let mut doc = TextDocument::new(once.clone());
    let outcome = Reindenter::new(IndentConfig::new())
        .with_pass(script_pass(&once))
        .reindent(&mut doc, &JS, IndentRequest::whole(once.len(), IndentMode::Reformat))
        .unwrap();
    assert!(outcome.is_unchanged(), "{:?}", outcome.edits);
    assert_eq!(doc.into_string(), once);
}

#[test]
fn test_tabs() {
    let config = IndentConfig::new().indent_width(4).tab_size(4).use_tabs(true);
    assert_eq!(
        reindent("{\n{\nx;\n}\n}\n", config, IndentMode::Reformat),
        "{\n\t{\n\t\tx;\n\t}\n}\n"
    );
}

#[test]
fn test_tab_indentation_of_same_width_is_rewritten() {
    let config = IndentConfig::new().indent_width(8);
    assert_eq!(
        reindent("{\n\tx;\n}\n", config, IndentMode::Reformat),
        "{\n        x;\n}\n"
    );
}

#[test]
fn test_indent_mode_fills_blank_line() {
    let text = "{\n\n}\n";
    let mut doc = TextDocument::new(text);
    let line = doc.line_start(1).unwrap();
    Reindenter::new(IndentConfig::new())
        .with_pass(script_pass(text))
        .reindent(&mut doc, &JS, IndentRequest::new(line, line, IndentMode::Indent))
        .unwrap();
    assert_eq!(doc.line_text(1), Some("    "));
}

#[test]
fn test_reformat_leaves_blank_lines_empty() {
    assert_eq!(
        reindent("{\nx;\n\ny;\n}\n", IndentConfig::new(), IndentMode::Reformat),
        "{\n    x;\n\n    y;\n}\n"
    );
}

#[test]
fn test_bad_location_is_swallowed_unless_strict() {
    let text = "{\nx;\n}\n";
    let request = IndentRequest::new(100, 200, IndentMode::Reformat);

    let mut doc = TextDocument::new(text);
    let outcome = Reindenter::new(IndentConfig::new())
        .with_pass(script_pass(text))
        .reindent(&mut doc, &JS, request)
        .unwrap();
    assert!(outcome.is_unchanged());
    assert_eq!(doc.as_str(), text);

    let err = Reindenter::new(IndentConfig::new().strict(true))
        .with_pass(script_pass(text))
        .reindent(&mut doc, &JS, request)
        .unwrap_err();
    assert!(err.is_bad_location());
    assert_eq!(doc.as_str(), text);
}

/// A strategy that forgets to return commands.
struct Forgetful;

impl IndentStrategy for Forgetful {
    type Kind = ();

    fn language(&self) -> LanguageId {
        JS
    }

    fn reset(&mut self) {}

    fn format_stable_start(
        &mut self,
        _doc: &dyn IndentDocument,
        _tokens: &mut JoinedTokens<'_, ()>,
        start: usize,
        _end: usize,
        _ignore: &mut OffsetRanges,
    ) -> IndentResult<usize> {
        Ok(start)
    }

    fn line_indent(
        &mut self,
        _ctx: &mut LineContext<'_, '_, ()>,
        _next_line: &mut Vec<IndentCommand>,
    ) -> IndentResult<Vec<IndentCommand>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_strategy_contract_violation_is_reported() {
    let text = "a\nb\n";
    let blocks = vec![CodeBlock::single(TokenSequence::new(
        JS,
        vec![Token::new((), Span::from_usize(0, text.len()))],
    ))];
    let mut doc = TextDocument::new(text);
    let err = Reindenter::new(IndentConfig::new())
        .with_pass(LanguageIndenter::new(Forgetful, blocks))
        .reindent(&mut doc, &JS, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap_err();
    assert!(matches!(err, IndentError::MissingCommands { line: 0 }));
}

#[derive(Default)]
struct Phases(Vec<Phase>);

impl PassObserver for &mut Phases {
    fn phase(&mut self, phase: Phase, _elapsed: Duration) {
        self.0.push(phase);
    }
}

#[test]
fn test_observer_sees_phases() {
    let text = "{\nx;\n}\n";
    let mut phases = Phases::default();
    let mut doc = TextDocument::new(text);
    Reindenter::new(IndentConfig::new())
        .with_pass(script_pass(text))
        .with_observer(&mut phases)
        .reindent(&mut doc, &JS, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();
    for phase in [Phase::LinePairs, Phase::ProcessLanguage, Phase::Merge, Phase::Resolve, Phase::Modify] {
        assert!(phases.0.contains(&phase), "{phase:?} missing from {:?}", phases.0);
    }
    // the whole document has no stable start search
    assert!(!phases.0.contains(&Phase::StableStart));
}

#[test]
fn test_rebase_after_foreign_edit() {
    let text = "{\nx;\n}\n";
    let mut doc = TextDocument::new(text);
    let mut reindenter = Reindenter::new(IndentConfig::new()).with_pass(script_pass(text));
    let mut pending = reindenter
        .compute(&doc, &JS, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();

    // another formatter inserts a line at the top
    let change = doc.replace(0, 0, "// head\n").unwrap();
    pending.rebase(&[change]);
    reindenter.finish(&mut doc, pending).unwrap();
    assert_eq!(doc.as_str(), "// head\n{\n    x;\n}\n");
}
