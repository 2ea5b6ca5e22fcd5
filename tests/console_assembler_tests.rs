//! Line assembler tests: echo, editing, dispatch, prompt

mod common;

use common::{SimpleContext, TestOutput};
use rust_tick_console::config::MAX_LINE_LEN;
use rust_tick_console::console::{Console, ConsoleError, PROMPT};
use rust_tick_console::led::LedMode;

fn feed(console: &mut Console, ctx: &mut SimpleContext, out: &mut TestOutput, bytes: &[u8]) {
    console.feed(bytes, ctx, out);
}

#[test]
fn test_led_fast_line_dispatches() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"led fast\r");

    assert_eq!(ctx.led, LedMode::Fast);
    assert_eq!(out.text, "led fast\r\nok\r\n> ");
}

#[test]
fn test_backspace_edits_line() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"ab\x08c");

    assert_eq!(console.line().as_str(), "ac");
    assert_eq!(out.text, "ab\x08 \x08c");
}

#[test]
fn test_edited_line_is_what_dispatches() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    // "led fasX" + DEL + "t" -> "led fast"
    feed(&mut console, &mut ctx, &mut out, b"led fasX\x7Ft\r");
    assert_eq!(ctx.led, LedMode::Fast);
}

#[test]
fn test_backspace_on_empty_line_is_silent() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"\x08\x7F");
    assert_eq!(out.text, "");
}

#[test]
fn test_unknown_command_then_prompt() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    let results: Vec<_> = b"foo\r"
        .iter()
        .filter_map(|&b| console.process_byte(b, &mut ctx, &mut out))
        .collect();

    assert_eq!(results, [Err(ConsoleError::UnknownCommand)]);
    assert_eq!(out.text, "foo\r\nunknown command\r\n> ");
}

#[test]
fn test_empty_line_reprompts_without_dispatch() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    assert!(console.process_byte(b'\r', &mut ctx, &mut out).is_none());
    assert_eq!(out.text, format!("\r\n{}", PROMPT));
}

#[test]
fn test_crlf_gives_one_dispatch_and_two_prompts() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"led off\r\n");

    assert_eq!(ctx.led, LedMode::Off);
    assert_eq!(out.text.matches("ok").count(), 1);
    assert_eq!(out.text.matches(PROMPT).count(), 2);
}

#[test]
fn test_non_printable_ignored() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"le\x1b\x00\td");

    assert_eq!(console.line().as_str(), "led");
    assert_eq!(out.text, "led");
}

#[test]
fn test_overlong_line_truncated_without_echo() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    let long = [b'x'; MAX_LINE_LEN + 5];
    feed(&mut console, &mut ctx, &mut out, &long);

    assert_eq!(console.line().len(), MAX_LINE_LEN);
    assert_eq!(console.line().dropped(), 5);
    assert_eq!(out.text.len(), MAX_LINE_LEN);
}

#[test]
fn test_partial_line_survives_between_feeds() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"led ");
    feed(&mut console, &mut ctx, &mut out, b"of");
    feed(&mut console, &mut ctx, &mut out, b"f\n");

    assert_eq!(ctx.led, LedMode::Off);
}

#[test]
fn test_reset_line_drops_partial_input() {
    let mut console = Console::new();
    let mut ctx = SimpleContext::new();
    let mut out = TestOutput::new();

    feed(&mut console, &mut ctx, &mut out, b"led of");
    console.reset_line();
    feed(&mut console, &mut ctx, &mut out, b"f\r");

    assert_eq!(ctx.led, LedMode::Slow);
    assert!(out.contains("unknown command"));
}

#[test]
fn test_banner() {
    let console = Console::new();
    let mut out = TestOutput::new();

    console.print_banner(&mut out);

    assert!(out.contains("TickConsole v"));
    assert!(out.text.ends_with("ok\r\n> "));
}
