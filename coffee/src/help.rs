const OVERVIEW: &str = "\
Coffee Filter is a soft typed language that uses ; as a line-ender
To get more information try one of the following commands:
-h v: Variables
-h t: Types
-h l: List
-h f: Functions
-h b: Branch logic
-h s: Standard Functions
-h g: Get the full Grammar
Coffee Filter prompt
-r {PATH}: Run a file of Coffee Filter code
-h: Help
-e: Exit the prompt";

const VARIABLES: &str = "\
variables are declared with 'var' {IDENTIFIER}
variables can be assigned with '=' {VALUE}
and accessed with {IDENTIFIER}";

const TYPES: &str = "\
Coffee Filter is soft typed and will assign types for you
Supported types are: Int, Bool, Functions, String, List, Object, Null
Basic functions like arithmetic and string concatenations are supported";

const LISTS: &str = "\
Lists are declared with [{VALUE},*]
Lists have some standard dot accesses: size, add(v), add_range(l), insert(i, v), remove(v)
Lists can be accessed with {IDENTIFIER}[] syntax";

const FUNCTIONS: &str = "\
Functions are declared as 'fun {IDENTIFIER}({PARAMS}){ return value; }'
Functions are values and can be assigned to variables as expected";

const BRANCHING: &str = "\
Supported branch logics are if, while, for
Conditions are truthy unless they are false, null or 0";

const STANDARD: &str = "\
Standard functions include:
print(value): Prints a value to the console
clock(): returns the current time in milliseconds";

const GRAMMAR: &str = r#"program                        -> line* EOF
line                           -> declaration | statement
declaration                    -> variable_declaration | function_declaration
variable_declaration           -> "var" IDENTIFIER ( "=" expression )? ";"
function_declaration           -> "fun" IDENTIFIER "(" parameters? ")" block
parameters                     -> IDENTIFIER ( "," IDENTIFIER )*
statement                      -> expression_statement | for | if | while | block | return
for                            -> "for" "(" ( variable_declaration | expression_statement | ";" ) expression? ";" expression? ")" statement
while                          -> "while" "(" expression ")" statement
if                             -> "if" "(" expression ")" statement ( "else" statement )?
block                          -> "{" line* "}"
expression_statement           -> expression ";"
return                         -> "return" expression? ";"
expression                     -> assignment
assignment                     -> postfix ( "=" | "+=" | "-=" ) assignment | logic_or
logic_or                       -> logic_and ( "or" logic_and )*
logic_and                      -> equality ( "and" equality )*
equality                       -> comparison ( ( "!=" | "==" ) comparison )*
comparison                     -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
term                           -> factor ( ( "-" | "+" ) factor )*
factor                         -> unary ( ( "/" | "*" | "%" ) unary )*
unary                          -> ( "!" | "-" ) unary | postfix
postfix                        -> primary ( "(" arguments? ")" | "[" expression "]" | "." IDENTIFIER )*
arguments                      -> expression ( "," expression )*
primary                        -> NUMBER | STRING | "true" | "false" | "null" | "(" expression ")"
                                | IDENTIFIER | "[" arguments? "]" | "{" declaration* "}""#;

/// Text for `-h [topic]`. Unknown topics print nothing.
pub fn topic(name: Option<&str>) -> Option<&'static str> {
    let name = match name {
        None => return Some(OVERVIEW),
        Some(name) => name.to_lowercase()
    };

    match name.as_str() {
        "v" | "variables" => Some(VARIABLES),
        "t" | "types" => Some(TYPES),
        "l" | "list" => Some(LISTS),
        "f" | "functions" => Some(FUNCTIONS),
        "b" | "branch" => Some(BRANCHING),
        "s" | "std" | "standard" => Some(STANDARD),
        "g" | "grammar" => Some(GRAMMAR),
        _ => None
    }
}
