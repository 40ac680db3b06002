//! 対話式の入力（モード選択・終了待ち）

use crate::error::{OrganizerError, Result};
use crate::organizer::Layout;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

const CHOICE_PROMPT: &str = "Enter your choice (1 or 2)";

/// 入力文字列をモードに変換。不正な場合は再入力を促すメッセージ
pub fn parse_choice(input: &str) -> std::result::Result<Layout, String> {
    let number: i64 = input
        .trim()
        .parse()
        .map_err(|_| "Invalid input. Please enter a number: 1 or 2".to_string())?;

    Layout::from_choice(number).ok_or_else(|| "Invalid input. Please enter 1 or 2".to_string())
}

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nPlease select the screenshot folder type:")?;
    for layout in [Layout::Loose, Layout::Nested] {
        writeln!(out, "{}: {}", layout.choice(), layout.description())?;
    }
    Ok(())
}

/// 有効な値が入力されるまで1行ずつ読む
///
/// 入力が途中で終わった場合（EOF）はエラー。
pub fn read_layout<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Layout> {
    loop {
        print_menu(out)?;
        write!(out, "{}: ", CHOICE_PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(OrganizerError::Prompt("no input available".into()));
        }

        match parse_choice(&line) {
            Ok(layout) => return Ok(layout),
            Err(message) => writeln!(out, "{}", message)?,
        }
    }
}

/// 端末ならdialoguer、そうでなければ標準入力から読む
pub fn select_layout() -> Result<Layout> {
    if !io::stdin().is_terminal() {
        let stdin = io::stdin();
        return read_layout(&mut stdin.lock(), &mut io::stdout());
    }

    print_menu(&mut io::stdout())?;
    let input: String = Input::new()
        .with_prompt(CHOICE_PROMPT)
        .validate_with(|s: &String| parse_choice(s).map(|_| ()))
        .interact_text()
        .map_err(|e| OrganizerError::Prompt(e.to_string()))?;

    parse_choice(&input).map_err(OrganizerError::Prompt)
}

/// Enterが押されるまで待つ（入力が閉じていれば即座に戻る）
pub fn wait_for_enter() {
    println!("\nPress Enter to exit...");
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), Ok(Layout::Loose));
        assert_eq!(parse_choice(" 2\n"), Ok(Layout::Nested));
        assert!(parse_choice("3").unwrap_err().contains("1 or 2"));
        assert!(parse_choice("abc").unwrap_err().contains("number"));
        assert!(parse_choice("").is_err());
    }

    #[test]
    fn test_read_layout_reprompts() {
        let mut input = Cursor::new("x\n0\n2\n");
        let mut out = Vec::new();

        let layout = read_layout(&mut input, &mut out).unwrap();
        assert_eq!(layout, Layout::Nested);

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Please select").count(), 3);
        assert!(printed.contains("Please enter a number"));
        assert!(printed.contains("Please enter 1 or 2"));
    }

    #[test]
    fn test_read_layout_eof() {
        let mut input = Cursor::new("7\n");
        let mut out = Vec::new();
        let result = read_layout(&mut input, &mut out);
        assert!(matches!(result, Err(OrganizerError::Prompt(_))));
    }
}
