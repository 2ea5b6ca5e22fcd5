//! Parser tests for console command line parsing

use rust_tick_console::console::parser::parse_line;

#[test]
fn test_parse_simple_command() {
    let cmd = parse_line("help");
    assert_eq!(cmd.command(), "help");
    assert_eq!(cmd.arg(0), None);
    assert_eq!(cmd.argc(), 1);
}

#[test]
fn test_parse_command_with_one_arg() {
    let cmd = parse_line("led fast");
    assert_eq!(cmd.command(), "led");
    assert_eq!(cmd.arg(0), Some("fast"));
    assert_eq!(cmd.arg(1), None);
}

#[test]
fn test_parse_collapses_repeated_spaces() {
    let cmd = parse_line("  adc   temp  ");
    assert_eq!(cmd.tokens(), ["adc", "temp"]);
}

#[test]
fn test_parse_splits_on_space_only() {
    // Tabs are not separators
    let cmd = parse_line("led\tfast");
    assert_eq!(cmd.argc(), 1);
    assert_eq!(cmd.command(), "led\tfast");
}

#[test]
fn test_parse_empty_line() {
    let cmd = parse_line("");
    assert_eq!(cmd.command(), "");
    assert!(cmd.is_empty());

    assert!(parse_line("     ").is_empty());
}

#[test]
fn test_parse_max_tokens() {
    let cmd = parse_line("a b c d e f g h i j");
    assert_eq!(cmd.argc(), 8);
    assert_eq!(cmd.arg(6), Some("h"));
    // "i" and "j" are dropped (max 8 tokens)
    assert_eq!(cmd.arg(7), None);
}
