
use std::fmt;

use num_bigint::BigInt;

use super::lexer::Location;

/// Closed set of binary operators.
///
/// Precedence and associativity are only consulted by the pretty-printer;
/// no evaluation happens anywhere in the compiler.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BinaryOp {
    Equality,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Assign,
}

pub struct OperatorInfo {
    pub symbol: &'static str,
    pub precedence: i32,
    pub right_associative: bool,
}

impl BinaryOp {
    pub fn info(self) -> OperatorInfo {
        let (symbol, precedence, right_associative) = match self {
            BinaryOp::Equality => ("==", 100, false),
            BinaryOp::Add => ("+", 200, false),
            BinaryOp::Subtract => ("-", 200, false),
            BinaryOp::Multiply => ("*", 210, false),
            BinaryOp::Divide => ("/", 210, false),
            BinaryOp::Modulo => ("%", 210, false),
            BinaryOp::Assign => ("=", 50, true),
        };

        OperatorInfo {
            symbol,
            precedence,
            right_associative,
        }
    }
}

// Assignments and declarations are their own node kinds but still print
// with a precedence, so that e.g. `(a = b) = c` keeps its parentheses
const ASSIGN_PRECEDENCE: i32 = 50;
const DECLARATION_PRECEDENCE: i32 = 450;

#[derive(Debug, PartialEq)]
pub enum AstNodeData {
    Nil,
    /// Reference to a declared name
    Identifier(String),
    Number(BigInt),
    /// Unsigned literal of inferred or explicit bit width, spelled `u<N>`
    UnsizedNumber(BigInt),
    Binary(BinaryOp, Box<AstNode>, Box<AstNode>),
    /// Ordered member list of a `module { ... }` expression
    Module(Vec<AstNode>),
    Assignment(Box<AstNode>, Box<AstNode>),
    Declaration {
        name: String,
        typ: Option<Box<AstNode>>,
        attributes: Vec<AstNode>,
    },
}

/// A node of the syntax tree. Nodes own their children exclusively; there
/// is no sharing and no cycles.
#[derive(Debug, PartialEq)]
pub struct AstNode {
    pub data: AstNodeData,
    pub location: Location,
}

impl AstNode {
    pub fn nil(location: Location) -> AstNode {
        AstNode {
            data: AstNodeData::Nil,
            location,
        }
    }

    pub fn identifier(location: Location, name: String) -> AstNode {
        AstNode {
            data: AstNodeData::Identifier(name),
            location,
        }
    }

    pub fn number(location: Location, value: BigInt) -> AstNode {
        AstNode {
            data: AstNodeData::Number(value),
            location,
        }
    }

    pub fn unsized_number(location: Location, value: BigInt) -> AstNode {
        AstNode {
            data: AstNodeData::UnsizedNumber(value),
            location,
        }
    }

    pub fn binary(location: Location, op: BinaryOp, lhs: AstNode, rhs: AstNode) -> AstNode {
        AstNode {
            data: AstNodeData::Binary(op, Box::new(lhs), Box::new(rhs)),
            location,
        }
    }

    pub fn module(location: Location, members: Vec<AstNode>) -> AstNode {
        AstNode {
            data: AstNodeData::Module(members),
            location,
        }
    }

    pub fn assignment(location: Location, lhs: AstNode, rhs: AstNode) -> AstNode {
        AstNode {
            data: AstNodeData::Assignment(Box::new(lhs), Box::new(rhs)),
            location,
        }
    }

    pub fn declaration(location: Location, name: String, typ: Option<AstNode>, attributes: Vec<AstNode>) -> AstNode {
        AstNode {
            data: AstNodeData::Declaration {
                name,
                typ: typ.map(Box::new),
                attributes,
            },
            location,
        }
    }

    /// Variant name for internal-consistency diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self.data {
            AstNodeData::Nil => "nil",
            AstNodeData::Identifier(_) => "identifier",
            AstNodeData::Number(_) => "number",
            AstNodeData::UnsizedNumber(_) => "unsized number",
            AstNodeData::Binary(..) => "binary operation",
            AstNodeData::Module(_) => "module expression",
            AstNodeData::Assignment(..) => "assignment",
            AstNodeData::Declaration { .. } => "declaration",
        }
    }

    /// Render the tree as source-like text.
    ///
    /// `terse` collapses module bodies to a placeholder. `parent_precedence`
    /// decides whether this node parenthesizes itself; statement context is
    /// precedence 0. `indent` is the tab depth of the surrounding module
    /// body. Printing the same tree twice yields identical text.
    pub fn pretty_print(&self, terse: bool, parent_precedence: i32, indent: usize) -> String {
        match &self.data {
            AstNodeData::Nil => "nil".to_string(),
            AstNodeData::Identifier(name) => name.clone(),
            AstNodeData::Number(value) => value.to_string(),
            AstNodeData::UnsizedNumber(value) => format!("u{}", value),
            AstNodeData::Binary(op, lhs, rhs) => {
                let info = op.info();

                let (lhs_prec, rhs_prec) = if info.right_associative {
                    (info.precedence + 1, info.precedence)
                } else {
                    (info.precedence, info.precedence + 1)
                };

                let s = format!("{} {} {}",
                    lhs.pretty_print(terse, lhs_prec, indent),
                    info.symbol,
                    rhs.pretty_print(terse, rhs_prec, indent));

                parenthesize(s, info.precedence, parent_precedence)
            },
            AstNodeData::Assignment(lhs, rhs) => {
                let s = format!("{} = {}",
                    lhs.pretty_print(terse, ASSIGN_PRECEDENCE + 1, indent),
                    rhs.pretty_print(terse, ASSIGN_PRECEDENCE, indent));

                parenthesize(s, ASSIGN_PRECEDENCE, parent_precedence)
            },
            AstNodeData::Declaration { name, typ, .. } => {
                let mut s = format!("{} :", name);

                if let Some(typ) = typ {
                    s.push(' ');
                    s.push_str(&typ.pretty_print(terse, DECLARATION_PRECEDENCE + 1, indent));
                }

                parenthesize(s, DECLARATION_PRECEDENCE, parent_precedence)
            },
            AstNodeData::Module(members) => {
                if terse {
                    return "module {...}".to_string();
                }

                let mut s = "module {\n".to_string();

                for member in members {
                    s.push_str(&tabs(indent + 1));
                    s.push_str(&member.pretty_print(false, 0, indent + 1));
                    s.push_str(";\n");
                }

                s.push_str(&tabs(indent));
                s.push('}');

                s
            },
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty_print(true, 0, 0))
    }
}

fn parenthesize(s: String, precedence: i32, parent_precedence: i32) -> String {
    if precedence < parent_precedence {
        format!("({})", s)
    } else {
        s
    }
}

fn tabs(indent: usize) -> String {
    "\t".repeat(indent)
}

/// Transform applied by `rewrite()`. Returning `None` prunes the node.
pub type Transform<'a> = dyn Fn(AstNode) -> Option<AstNode> + 'a;

/// Generic tree rewrite.
///
/// `pre` runs before the children are visited, `post` afterwards. Children
/// are rebuilt from the (possibly replaced) node that `pre` returned, each
/// visited exactly once. A pruned child of a fixed-arity node is replaced
/// with `Nil`; pruned module members and declaration attributes are dropped
/// from their lists. Pruning the root yields `None`.
pub fn rewrite(node: AstNode, pre: Option<&Transform>, post: Option<&Transform>) -> Option<AstNode> {
    let node = match pre {
        Some(f) => f(node)?,
        None => node,
    };

    let AstNode { data, location } = node;

    let data = match data {
        AstNodeData::Binary(op, lhs, rhs) => {
            let lhs = rewrite_or_nil(*lhs, pre, post);
            let rhs = rewrite_or_nil(*rhs, pre, post);

            AstNodeData::Binary(op, Box::new(lhs), Box::new(rhs))
        },
        AstNodeData::Assignment(lhs, rhs) => {
            let lhs = rewrite_or_nil(*lhs, pre, post);
            let rhs = rewrite_or_nil(*rhs, pre, post);

            AstNodeData::Assignment(Box::new(lhs), Box::new(rhs))
        },
        AstNodeData::Module(members) => {
            let members = members.into_iter()
                .filter_map(|member| rewrite(member, pre, post))
                .collect();

            AstNodeData::Module(members)
        },
        AstNodeData::Declaration { name, typ, attributes } => {
            let typ = typ.and_then(|typ| rewrite(*typ, pre, post))
                .map(Box::new);

            let attributes = attributes.into_iter()
                .filter_map(|attribute| rewrite(attribute, pre, post))
                .collect();

            AstNodeData::Declaration {
                name,
                typ,
                attributes,
            }
        },
        leaf => leaf,
    };

    let node = AstNode {
        data,
        location,
    };

    match post {
        Some(f) => f(node),
        None => Some(node),
    }
}

fn rewrite_or_nil(child: AstNode, pre: Option<&Transform>, post: Option<&Transform>) -> AstNode {
    let location = child.location.clone();

    rewrite(child, pre, post)
        .unwrap_or_else(|| AstNode::nil(location))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    fn location() -> Location {
        Location::new(Rc::from("test.rtl"), 1)
    }

    fn identifier(name: &str) -> AstNode {
        AstNode::identifier(location(), name.to_string())
    }

    fn number(value: i32) -> AstNode {
        AstNode::number(location(), BigInt::from(value))
    }

    #[test]
    fn pretty_print_respects_precedence() {
        // a + b * c needs no parentheses, (a + b) * c does
        let flat = AstNode::binary(location(), BinaryOp::Add,
            identifier("a"),
            AstNode::binary(location(), BinaryOp::Multiply, identifier("b"), identifier("c")));

        assert_eq!(flat.pretty_print(false, 0, 0), "a + b * c");

        let grouped = AstNode::binary(location(), BinaryOp::Multiply,
            AstNode::binary(location(), BinaryOp::Add, identifier("a"), identifier("b")),
            identifier("c"));

        assert_eq!(grouped.pretty_print(false, 0, 0), "(a + b) * c");
    }

    #[test]
    fn pretty_print_left_associativity() {
        // a - b - c reprints without parentheses, a - (b - c) keeps them
        let left = AstNode::binary(location(), BinaryOp::Subtract,
            AstNode::binary(location(), BinaryOp::Subtract, identifier("a"), identifier("b")),
            identifier("c"));

        assert_eq!(left.pretty_print(false, 0, 0), "a - b - c");

        let right = AstNode::binary(location(), BinaryOp::Subtract,
            identifier("a"),
            AstNode::binary(location(), BinaryOp::Subtract, identifier("b"), identifier("c")));

        assert_eq!(right.pretty_print(false, 0, 0), "a - (b - c)");
    }

    #[test]
    fn pretty_print_module_body() {
        let module = AstNode::module(location(), vec![
            AstNode::declaration(location(), "a".to_string(), Some(identifier("int")), Vec::new()),
            AstNode::assignment(location(), identifier("a"), number(1)),
        ]);

        assert_eq!(module.pretty_print(false, 0, 0), "module {\n\ta : int;\n\ta = 1;\n}");
        assert_eq!(module.pretty_print(true, 0, 0), "module {...}");
    }

    #[test]
    fn pretty_print_unsized_literal() {
        let declaration = AstNode::declaration(location(), "a".to_string(),
            Some(AstNode::unsized_number(location(), BigInt::from(8))), Vec::new());

        assert_eq!(declaration.pretty_print(false, 0, 0), "a : u8");
    }

    #[test]
    fn pretty_print_is_stable() {
        let tree = AstNode::module(location(), vec![
            AstNode::assignment(location(), identifier("x"),
                AstNode::binary(location(), BinaryOp::Equality, identifier("y"), number(3))),
        ]);

        assert_eq!(tree.pretty_print(false, 0, 0), tree.pretty_print(false, 0, 0));
    }

    #[test]
    fn rewrite_without_transforms_is_identity() {
        let tree = AstNode::module(location(), vec![
            AstNode::assignment(location(), identifier("a"), number(1)),
        ]);
        let expected = AstNode::module(location(), vec![
            AstNode::assignment(location(), identifier("a"), number(1)),
        ]);

        let result = rewrite(tree, None, None).unwrap();

        assert_eq!(result, expected);
    }

    #[test]
    fn rewrite_replaces_leaves() {
        let tree = AstNode::assignment(location(), identifier("a"), identifier("b"));

        let rename: &Transform = &|node: AstNode| {
            match node.data {
                AstNodeData::Identifier(name) => {
                    Some(AstNode::identifier(node.location, format!("{}_renamed", name)))
                },
                _ => Some(node),
            }
        };

        let result = rewrite(tree, None, Some(rename)).unwrap();

        assert_eq!(result.pretty_print(false, 0, 0), "a_renamed = b_renamed");
    }

    #[test]
    fn rewrite_prunes_module_members() {
        let tree = AstNode::module(location(), vec![
            AstNode::assignment(location(), identifier("a"), number(1)),
            AstNode::assignment(location(), identifier("b"), number(2)),
        ]);

        let drop_b: &Transform = &|node: AstNode| {
            match &node.data {
                AstNodeData::Assignment(lhs, _) if lhs.data == AstNodeData::Identifier("b".to_string()) => None,
                _ => Some(node),
            }
        };

        let result = rewrite(tree, Some(drop_b), None).unwrap();

        match result.data {
            AstNodeData::Module(members) => assert_eq!(members.len(), 1),
            other => panic!("expected module, got {:?}", other),
        }
    }

    #[test]
    fn rewrite_pruned_operand_becomes_nil() {
        let tree = AstNode::assignment(location(), identifier("a"), number(1));

        let drop_numbers: &Transform = &|node: AstNode| {
            match node.data {
                AstNodeData::Number(_) => None,
                _ => Some(node),
            }
        };

        let result = rewrite(tree, Some(drop_numbers), None).unwrap();

        assert_eq!(result.pretty_print(false, 0, 0), "a = nil");
    }

    #[test]
    fn rewrite_can_prune_root() {
        let tree = AstNode::module(location(), Vec::new());

        let drop_all: &Transform = &|_| None;

        assert!(rewrite(tree, Some(drop_all), None).is_none());
    }

    #[test]
    fn rewrite_pre_runs_before_children() {
        // pre replaces the whole rhs subtree; its children are then visited
        // and renamed by post
        let tree = AstNode::assignment(location(), identifier("a"), number(1));

        let pre: &Transform = &|node: AstNode| {
            match node.data {
                AstNodeData::Number(_) => Some(identifier("q")),
                _ => Some(node),
            }
        };
        let post: &Transform = &|node: AstNode| {
            match node.data {
                AstNodeData::Identifier(name) => {
                    Some(AstNode::identifier(node.location, format!("{}!", name)))
                },
                _ => Some(node),
            }
        };

        let result = rewrite(tree, Some(pre), Some(post)).unwrap();

        assert_eq!(result.pretty_print(false, 0, 0), "a! = q!");
    }
}
