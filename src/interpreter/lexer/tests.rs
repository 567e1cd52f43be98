use pretty_assertions::assert_eq;
use crate::interpreter::diagnostic::Diagnostics;
use super::*;

fn scan(source: &str) -> (Vec<Token>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = Lexer::new(source).tokenize(&mut diagnostics);

    (tokens, diagnostics)
}

fn types(source: &str) -> Vec<TokenType> {
    scan(source).0.iter().map(Token::token_type).collect()
}

mod punctuation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_characters() {
        assert_eq!(vec![
            TokenType::ParenthesisLeft, TokenType::ParenthesisRight,
            TokenType::BracketLeft, TokenType::BracketRight,
            TokenType::Comma, TokenType::Dot, TokenType::Minus, TokenType::Plus,
            TokenType::Semicolon, TokenType::Star, TokenType::Slash,
            TokenType::Eof,
        ], types("(){},.-+;*/"));
    }

    #[test]
    fn two_character_operators_prefer_longest_match() {
        assert_eq!(vec![
            TokenType::NotEqual, TokenType::Equal, TokenType::LessEqual, TokenType::GreaterEqual,
            TokenType::Not, TokenType::Assign, TokenType::Less, TokenType::Greater,
            TokenType::Eof,
        ], types("!= == <= >= ! = < >"));

        assert_eq!(vec![TokenType::Equal, TokenType::Assign, TokenType::Eof], types("==="));
    }
}

mod literals {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_carry_their_value() {
        let (tokens, diagnostics) = scan("12 3.25");

        assert!(diagnostics.is_empty());
        assert_eq!(Some(&Literal::Number(12.0)), tokens[0].literal());
        assert_eq!("3.25", tokens[1].source());
        assert_eq!(Some(&Literal::Number(3.25)), tokens[1].literal());
    }

    #[test]
    fn oversized_numbers_scan_without_errors() {
        let (tokens, diagnostics) = scan(&"9".repeat(400));

        assert!(diagnostics.is_empty());
        assert_eq!(Some(&Literal::Number(f64::INFINITY)), tokens[0].literal());
        assert_eq!(vec![TokenType::Number, TokenType::Eof], tokens.iter().map(Token::token_type).collect::<Vec<_>>());
    }

    #[test]
    fn trailing_dot_is_not_part_of_the_number() {
        assert_eq!(vec![TokenType::Number, TokenType::Dot, TokenType::Eof], types("1."));
        assert_eq!(vec![TokenType::Dot, TokenType::Number, TokenType::Eof], types(".5"));
    }

    #[test]
    fn strings_strip_quotes_from_the_literal_only() {
        let (tokens, _) = scan("\"hello world\"");

        assert_eq!(TokenType::String, tokens[0].token_type());
        assert_eq!("\"hello world\"", tokens[0].source());
        assert_eq!(Some(&Literal::String(String::from("hello world"))), tokens[0].literal());
    }

    #[test]
    fn strings_may_span_lines() {
        let (tokens, diagnostics) = scan("\"a\nb\" x");

        assert!(diagnostics.is_empty());
        assert_eq!(Some(&Literal::String(String::from("a\nb"))), tokens[0].literal());
        assert_eq!(2, tokens[1].line());
    }

    #[test]
    fn backslashes_are_not_escapes() {
        let (tokens, _) = scan(r#""a\n""#);

        assert_eq!(Some(&Literal::String(String::from("a\\n"))), tokens[0].literal());
    }
}

mod identifiers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keywords_match_exactly() {
        assert_eq!(vec![
            TokenType::And, TokenType::Class, TokenType::Else, TokenType::False,
            TokenType::For, TokenType::Fun, TokenType::If, TokenType::Nil,
            TokenType::Or, TokenType::Print, TokenType::Return, TokenType::Super,
            TokenType::This, TokenType::True, TokenType::Var, TokenType::While,
            TokenType::Eof,
        ], types("and class else false for fun if nil or print return super this true var while"));
    }

    #[test]
    fn keyword_prefixes_are_identifiers() {
        assert_eq!(vec![
            TokenType::Identifier, TokenType::Identifier, TokenType::Identifier, TokenType::Identifier,
            TokenType::Eof,
        ], types("orchid variable _if While"));
    }

    #[test]
    fn identifiers_may_contain_digits_and_underscores() {
        let (tokens, _) = scan("snake_case2");

        assert_eq!(TokenType::Identifier, tokens[0].token_type());
        assert_eq!("snake_case2", tokens[0].source());
    }
}

mod trivia {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comments_run_to_end_of_line() {
        let (tokens, _) = scan("1 // comment ; \"\n2");

        assert_eq!(vec![TokenType::Number, TokenType::Number, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!(2, tokens[1].line());
    }

    #[test]
    fn newlines_advance_the_line_counter() {
        let (tokens, _) = scan("a\n\n\tb\r\nc");

        assert_eq!(vec![1, 3, 4, 4], tokens.iter().map(Token::line).collect::<Vec<_>>());
    }

    #[test]
    fn empty_source_is_just_eof() {
        let (tokens, diagnostics) = scan("");

        assert!(diagnostics.is_empty());
        assert_eq!(1, tokens.len());
        assert_eq!(TokenType::Eof, tokens[0].token_type());
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unexpected_characters_are_reported_and_skipped() {
        let (tokens, diagnostics) = scan("1 @ 2\n#");

        assert_eq!(vec![TokenType::Number, TokenType::Number, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!(2, diagnostics.len());
        assert_eq!(1, diagnostics.entries[0].line);
        assert_eq!("Unexpected character '@'.", diagnostics.entries[0].message);
        assert_eq!(2, diagnostics.entries[1].line);
    }

    #[test]
    fn unterminated_string_reports_its_start_line() {
        let (tokens, diagnostics) = scan("print \"abc\n\ndef");

        assert_eq!(vec![TokenType::Print, TokenType::Eof],
                   tokens.iter().map(Token::token_type).collect::<Vec<_>>());
        assert_eq!(1, diagnostics.len());
        assert_eq!(1, diagnostics.entries[0].line);
        assert_eq!("Unterminated string.", diagnostics.entries[0].message);
    }
}

#[test]
fn scanning_is_repeatable() {
    let source = "fun f(a) { return a * 2.5 >= \"x\"; } // done";

    assert_eq!(scan(source).0, scan(source).0);
}
