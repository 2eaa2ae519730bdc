//! `mbel grammar` - constant notation reference.

use crate::cli::GrammarFormat;

const BNF: &str = r#"document   := version? (section | statement)*
version    := '§' ident (':' | '::') version_string NL
section    := '[' SECTION_NAME ']' NL
statement  := link | anchor | decision | heat | intent | attribute | expression
link       := ('@feature' | '@task') '{' NAME '}' arrow_clause*
anchor     := ('@entry::' | '@hotspot::' | '@boundary::') PATH ('\n' arrow_clause)*
decision   := '@' DATE '::' NAME ('\n' arrow_clause)*
heat       := ('@critical::'|'@stable::'|'@volatile::'|'@hot::') PATH ('\n' arrow_clause)*
intent     := '@' UpperIdent '::' Ident ('\n' arrow_clause)*
arrow_clause := '->' KEYWORD (list | meta | '::' rest_of_line)
list       := '[' item (',' item)* ']'
item       := PATH ( '{' MARKER '}' )? ( ':' INT '-' INT )? | QUOTED | IDENT
meta       := '{' ... '}'            (* balanced, nested {} allowed *)
attribute  := TEMPORAL? IDENT '::' expression
expression := chain ( LOGICOP chain )*

operators:
  temporal   >  @  ?  ≈
  state      ✓  ✗  !  ⚡
  relation   ::  →  ←  ↔  +  -
  structure  [..]  {..}  (..)  <..>  |
  quantity   #  %  ~
  logic      &  ||  ¬
  meta       ©  §"#;

const EXAMPLES: &str = r#"§MBEL:5.0

[FOCUS]
@active::ParserRewrite⚡

[ARCHITECTURE]
@feature{Lexer}->files[src/lexer.ts]->tests[tests/lexer.test.ts]
@feature{Parser}->files[src/parser.ts]->depends[Lexer]->entryPoint{src/parser.ts:parse}

@entry::src/index.ts
  ->description::Main entry point
@hotspot::src/parser.ts

@critical::src/core.ts
  ->dependents[src/lexer.ts,src/parser.ts]
  ->changes::21

@2024-01-15::UseAdjacencyLists
  ->status::ACTIVE
  ->reason::avoids cyclic ownership
  ->alternatives[pointers,arena]

@Parser::tokenize
  ->does::splits source into tokens
  ->doesNot::resolve references"#;

pub fn run(format: GrammarFormat) -> i32 {
    match format {
        GrammarFormat::Bnf => println!("{BNF}"),
        GrammarFormat::Examples => println!("{EXAMPLES}"),
    }
    0
}
