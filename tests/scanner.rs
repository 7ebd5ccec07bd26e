#[cfg(test)]
mod scanner_tests {
    use clike_lexer as clex;

    use clex::error::LexError;
    use clex::intern::Interner;
    use clex::keywords::ReservedWords;
    use clex::scanner::*;
    use clex::token::*;
    use clex::value::Value;
    use pretty_assertions::assert_eq;

    fn scan_all(interner: &Interner, source: &str) -> Vec<Token> {
        let reserved = ReservedWords::new(interner);
        let scanner = Scanner::new("test.c", source, interner, &reserved);

        scanner
            .collect::<Result<Vec<_>, _>>()
            .expect("source should lex")
    }

    fn types_of(source: &str) -> Vec<TokenType> {
        let interner = Interner::new();

        scan_all(&interner, source)
            .into_iter()
            .map(|t| t.token_type)
            .collect()
    }

    fn assert_token_sequence(source: &str, expected: &[TokenType]) {
        let mut expected: Vec<TokenType> = expected.to_vec();
        expected.push(TokenType::EOF);

        assert_eq!(types_of(source), expected, "source: {:?}", source);
    }

    fn single_value(source: &str) -> (TokenType, Value) {
        let interner = Interner::new();
        let tokens = scan_all(&interner, source);

        assert_eq!(tokens.len(), 2, "expected one token in {:?}", source);

        (tokens[0].token_type, tokens[0].value.expect("value-bearing token"))
    }

    fn scan_error(source: &str) -> LexError {
        let interner = Interner::new();
        let reserved = ReservedWords::new(&interner);
        let scanner = Scanner::new("bad.c", source, &interner, &reserved);

        let err = scanner
            .filter_map(Result::err)
            .next()
            .expect("source should fail to lex");
        err
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({[*.,;]})",
            &[
                TokenType::LEFT_PAREN,
                TokenType::LEFT_BRACE,
                TokenType::LEFT_BRACKET,
                TokenType::ASTERISK,
                TokenType::DOT,
                TokenType::COMMA,
                TokenType::SEMICOLON,
                TokenType::RIGHT_BRACKET,
                TokenType::RIGHT_BRACE,
                TokenType::RIGHT_PAREN,
            ],
        );
    }

    #[test]
    fn test_scanner_02_operator_disambiguation() {
        assert_token_sequence("+", &[TokenType::PLUS]);
        assert_token_sequence("++", &[TokenType::INCREMENT]);
        assert_token_sequence("+=", &[TokenType::ADD_ASSIGN]);
        assert_token_sequence("-", &[TokenType::MINUS]);
        assert_token_sequence("--", &[TokenType::DECREMENT]);
        assert_token_sequence("-=", &[TokenType::SUBTRACT_ASSIGN]);
        assert_token_sequence("->", &[TokenType::ARROW]);
        assert_token_sequence("==", &[TokenType::EQUALITY]);
        assert_token_sequence("=", &[TokenType::ASSIGN]);
        assert_token_sequence("<", &[TokenType::LESS_THAN]);
        assert_token_sequence("<=", &[TokenType::LESS_EQUAL]);
        assert_token_sequence(">", &[TokenType::GREATER_THAN]);
        assert_token_sequence(">=", &[TokenType::GREATER_EQUAL]);
        assert_token_sequence("&", &[TokenType::AMPERSAND]);
        assert_token_sequence("&&", &[TokenType::LOGICAL_AND]);
        assert_token_sequence("|", &[TokenType::ARITHMETIC_OR]);
        assert_token_sequence("||", &[TokenType::LOGICAL_OR]);
        assert_token_sequence("!", &[TokenType::UNARY_NOT]);
        assert_token_sequence("!=", &[TokenType::NOT_EQUAL]);
    }

    #[test]
    fn test_scanner_03_lookahead_is_greedy_once() {
        // "+++" is "++" then "+"; "a-->b" is a, --, >, b
        assert_token_sequence("+++", &[TokenType::INCREMENT, TokenType::PLUS]);
        assert_token_sequence(
            "a-->b",
            &[
                TokenType::IDENTIFIER,
                TokenType::DECREMENT,
                TokenType::GREATER_THAN,
                TokenType::IDENTIFIER,
            ],
        );
        assert_token_sequence("===", &[TokenType::EQUALITY, TokenType::ASSIGN]);
    }

    #[test]
    fn test_scanner_04_keyword_precedence() {
        assert_token_sequence("int", &[TokenType::INT]);
        assert_token_sequence("integer", &[TokenType::IDENTIFIER]);
        assert_token_sequence("#define", &[TokenType::HASH_DEFINE]);
        assert_token_sequence("#include", &[TokenType::HASH_INCLUDE]);
        assert_token_sequence(
            "unsigned long while_",
            &[TokenType::UNSIGNED, TokenType::LONG, TokenType::IDENTIFIER],
        );
    }

    #[test]
    fn test_scanner_05_identifiers_are_interned() {
        let interner = Interner::new();
        let tokens = scan_all(&interner, "count x count");

        let words: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t.value {
                Some(Value::Str(w)) => Some(w),
                _ => None,
            })
            .collect();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0], words[2]);
        assert_ne!(words[0], words[1]);
        assert_eq!(interner.resolve(words[0]), "count");
        assert!(std::ptr::eq(
            interner.resolve(words[0]),
            interner.resolve(words[2])
        ));

        // A second source unit sharing the interner sees the same word.
        let again = scan_all(&interner, "count");
        assert_eq!(again[0].value, Some(Value::Str(words[0])));
    }

    #[test]
    fn test_scanner_06_numbers() {
        assert_eq!(
            single_value("123"),
            (TokenType::INTEGER_CONSTANT, Value::Int(123))
        );
        assert_eq!(
            single_value("12.5"),
            (TokenType::FP_CONSTANT, Value::Float(12.5))
        );
        assert_eq!(
            single_value("1e2"),
            (TokenType::FP_CONSTANT, Value::Float(100.0))
        );
        assert_eq!(
            single_value("3.0e1"),
            (TokenType::FP_CONSTANT, Value::Float(30.0))
        );
        assert_eq!(
            single_value("7."),
            (TokenType::FP_CONSTANT, Value::Float(7.0))
        );
    }

    #[test]
    fn test_scanner_07_signed_exponents() {
        match single_value("2.5e-1") {
            (TokenType::FP_CONSTANT, Value::Float(n)) => assert!((n - 0.25).abs() < 1e-12),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            single_value("4E+2"),
            (TokenType::FP_CONSTANT, Value::Float(400.0))
        );
    }

    #[test]
    fn test_scanner_08_e_without_digits_is_not_an_exponent() {
        assert_token_sequence(
            "1else",
            &[TokenType::INTEGER_CONSTANT, TokenType::ELSE],
        );
        assert_token_sequence(
            "2e",
            &[TokenType::INTEGER_CONSTANT, TokenType::IDENTIFIER],
        );
    }

    #[test]
    fn test_scanner_09_strings_keep_escapes_raw() {
        let interner = Interner::new();
        let tokens = scan_all(&interner, r#""say \"hi\"\n" x"#);

        assert_eq!(tokens[0].token_type, TokenType::STRING_CONSTANT);
        match tokens[0].value {
            Some(Value::Str(w)) => assert_eq!(interner.resolve(w), r#"say \"hi\"\n"#),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(tokens[1].token_type, TokenType::IDENTIFIER);
    }

    #[test]
    fn test_scanner_10_identical_strings_share_storage() {
        let interner = Interner::new();
        let tokens = scan_all(&interner, r#""abc" "abc""#);

        assert_eq!(tokens[0].value, tokens[1].value);
    }

    #[test]
    fn test_scanner_11_unterminated_string_runs_to_end() {
        let interner = Interner::new();
        let tokens = scan_all(&interner, "\"open");

        assert_eq!(tokens.len(), 2);
        match tokens[0].value {
            Some(Value::Str(w)) => assert_eq!(interner.resolve(w), "open"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scanner_12_character_literals() {
        assert_eq!(
            single_value("'a'"),
            (TokenType::CHARACTER_CONSTANT, Value::Int(i64::from(b'a')))
        );

        let err = scan_error("'ab'");
        assert!(matches!(err, LexError::Lex { .. }));
        assert_eq!(err.to_string(), "bad.c:1: illegal character 'b'");

        assert!(matches!(scan_error("'a"), LexError::Lex { .. }));
    }

    #[test]
    fn test_scanner_13_comments_are_skipped() {
        assert_eq!(types_of("/* x */int"), types_of("int"));
        assert_eq!(types_of("// x\nint"), types_of("int"));
        assert_token_sequence("a /* ** / */ / b", &[
            TokenType::IDENTIFIER,
            TokenType::SLASH,
            TokenType::IDENTIFIER,
        ]);
        assert_token_sequence("x // trailing", &[TokenType::IDENTIFIER]);
        assert_token_sequence("/* unterminated", &[]);
    }

    #[test]
    fn test_scanner_14_lines_are_counted() {
        let interner = Interner::new();
        let reserved = ReservedWords::new(&interner);
        let mut scanner = Scanner::new("lines.c", "a\n/* one\ntwo */ b\n// c\n\"x\ny\" d", &interner, &reserved);

        scanner.next_token().unwrap();
        assert_eq!(scanner.token_line(), 1);

        scanner.next_token().unwrap();
        assert_eq!(scanner.token_line(), 3);

        scanner.next_token().unwrap();
        assert_eq!(scanner.token_line(), 5);

        scanner.next_token().unwrap();
        assert_eq!(scanner.token_line(), 6);
    }

    #[test]
    fn test_scanner_15_illegal_character_reports_location() {
        let err = scan_error("int x;\nx = $;");

        assert_eq!(err.to_string(), "bad.c:2: illegal character '$'");
    }

    #[test]
    fn test_scanner_16_exactly_one_eof() {
        let interner = Interner::new();
        let reserved = ReservedWords::new(&interner);
        let mut scanner = Scanner::new("t.c", "x", &interner, &reserved);

        let results: Vec<_> = scanner.by_ref().collect();
        assert_eq!(results.len(), 2);
        assert!(scanner.next().is_none());

        let eofs = results
            .iter()
            .filter(|r| matches!(r, Ok(t) if t.token_type == TokenType::EOF))
            .count();
        assert_eq!(eofs, 1);
    }

    #[test]
    fn test_scanner_17_refills_from_line_source() {
        let interner = Interner::new();
        let reserved = ReservedWords::new(&interner);
        let input = std::io::Cursor::new("x = 1;\n\nreturn x;\n");
        let scanner = Scanner::new("<stdin>", "int x;\n", &interner, &reserved).with_input(input);

        let types: Vec<TokenType> = scanner.map(|r| r.unwrap().token_type).collect();

        assert_eq!(
            types,
            vec![
                TokenType::INT,
                TokenType::IDENTIFIER,
                TokenType::SEMICOLON,
                TokenType::IDENTIFIER,
                TokenType::ASSIGN,
                TokenType::INTEGER_CONSTANT,
                TokenType::SEMICOLON,
                TokenType::RETURN,
                TokenType::IDENTIFIER,
                TokenType::SEMICOLON,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn test_scanner_18_small_program() {
        assert_token_sequence(
            "int main() {\n  char *s = \"hi\";\n  return s[0] != 'h' ? 1 : 0;\n}\n",
            &[
                TokenType::INT,
                TokenType::IDENTIFIER,
                TokenType::LEFT_PAREN,
                TokenType::RIGHT_PAREN,
                TokenType::LEFT_BRACE,
                TokenType::CHAR,
                TokenType::ASTERISK,
                TokenType::IDENTIFIER,
                TokenType::ASSIGN,
                TokenType::STRING_CONSTANT,
                TokenType::SEMICOLON,
                TokenType::RETURN,
                TokenType::IDENTIFIER,
                TokenType::LEFT_BRACKET,
                TokenType::INTEGER_CONSTANT,
                TokenType::RIGHT_BRACKET,
                TokenType::NOT_EQUAL,
                TokenType::CHARACTER_CONSTANT,
                TokenType::QUESTION_MARK,
                TokenType::INTEGER_CONSTANT,
                TokenType::COLON,
                TokenType::INTEGER_CONSTANT,
                TokenType::SEMICOLON,
                TokenType::RIGHT_BRACE,
            ],
        );
    }

    fn refilled(interner: &Interner, lines: &str) -> Vec<Token> {
        let reserved = ReservedWords::new(interner);
        let input = std::io::Cursor::new(lines.to_owned());
        let scanner = Scanner::new("<stdin>", "", interner, &reserved).with_input(input);

        scanner
            .collect::<Result<Vec<_>, _>>()
            .expect("input should lex")
    }

    #[test]
    fn test_scanner_19_block_comment_continues_across_refills() {
        let interner = Interner::new();
        let types: Vec<TokenType> = refilled(&interner, "/* a\nb */ int\n")
            .into_iter()
            .map(|t| t.token_type)
            .collect();

        assert_eq!(types, vec![TokenType::INT, TokenType::EOF]);

        let reserved = ReservedWords::new(&interner);
        let input = std::io::Cursor::new("still comment\n*/ x\n");
        let mut scanner = Scanner::new("<stdin>", "/* open\n", &interner, &reserved).with_input(input);

        assert_eq!(scanner.next_token().unwrap().token_type, TokenType::IDENTIFIER);
        assert_eq!(scanner.token_line(), 3);
    }

    #[test]
    fn test_scanner_20_string_continues_across_refills() {
        let interner = Interner::new();
        let tokens = refilled(&interner, "\"a\nb\" c\n");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token_type, TokenType::STRING_CONSTANT);
        match tokens[0].value {
            Some(Value::Str(w)) => assert_eq!(interner.resolve(w), "a\nb"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(tokens[1].token_type, TokenType::IDENTIFIER);
        assert_eq!(tokens[1].value, Some(Value::Str(interner.intern("c"))));

        // the same text from one span interns to the same word
        assert_eq!(tokens[0].value, scan_all(&interner, "\"a\nb\"")[0].value);

        // still open when input runs out
        let tokens = refilled(&interner, "\"open\nstill\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, Some(Value::Str(interner.intern("open\nstill\n"))));
    }

    #[test]
    fn test_scanner_21_zero_mantissa_with_huge_exponent() {
        for source in ["0e400", "0.0e999", "0.0E+999", "0e-400"] {
            match single_value(source) {
                (TokenType::FP_CONSTANT, Value::Float(n)) => {
                    assert_eq!(n, 0.0, "source: {:?}", source)
                }
                other => panic!("unexpected {:?} for {:?}", other, source),
            }
        }
    }

    #[test]
    fn test_scanner_22_newline_character_literal_counts_a_line() {
        assert_eq!(
            single_value("'\n'"),
            (TokenType::CHARACTER_CONSTANT, Value::Int(i64::from(b'\n')))
        );

        let err = scan_error("'\n'\n$");
        assert_eq!(err.to_string(), "bad.c:3: illegal character '$'");
    }
}
