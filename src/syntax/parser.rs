//! swc front end: parse a TypeScript module and read back the declarations
//! the compiler cares about.
use swc_common::sync::Lrc;
use swc_common::{FileName, Globals, SourceMap, SourceMapper, Span, Spanned, GLOBALS};
use swc_ecma_ast::{
    Decl, DefaultDecl, EsVersion, Expr, Lit, ModuleDecl, ModuleItem, Stmt, TsEntityName,
    TsInterfaceDecl, TsKeywordTypeKind, TsLit, TsType, TsTypeAliasDecl, TsTypeElement,
    TsTypeParamDecl, TsUnionOrIntersectionType, VarDeclKind,
};
use swc_ecma_parser::{error::Error as SwcError, parse_file_as_module, Syntax, TsConfig};

use super::ast::*;
use super::ParseError;

pub struct Parser {
    cm: Lrc<SourceMap>,
}

// ————————————————————————————————————————————————————————————————————————————
// ENTRY
// ————————————————————————————————————————————————————————————————————————————

impl Parser {
    pub fn new() -> Self {
        Self { cm: Default::default() }
    }

    /// Top-level declarations in file order. Errors the parser recovers from
    /// still fail the parse.
    pub fn parse_module(&self, src: &str) -> Result<Vec<Declaration>, ParseError> {
        let fm = self.cm.new_source_file(FileName::Anon, src.to_string());
        let mut recovered = Vec::new();
        let module = GLOBALS
            .set(&Globals::new(), || {
                parse_file_as_module(
                    &fm,
                    Syntax::Typescript(TsConfig::default()),
                    EsVersion::EsNext,
                    None,
                    &mut recovered,
                )
            })
            .map_err(|error| self.error(error))?;
        if let Some(error) = recovered.into_iter().next() {
            return Err(self.error(error));
        }
        Ok(module.body.iter().map(|item| self.item(item)).collect())
    }

    fn error(&self, error: SwcError) -> ParseError {
        let loc = self.cm.lookup_char_pos(error.span().lo);
        ParseError::new(loc.line, loc.col.0 + 1, error.kind().msg())
    }

    fn snippet(&self, span: Span) -> String {
        self.cm.span_to_snippet(span).unwrap_or_default()
    }

    fn other(&self, kind: &'static str, span: Span) -> Declaration {
        let line = self.cm.lookup_char_pos(span.lo).line;
        tracing::trace!(kind, line, "skipping top-level statement");
        Declaration::Other(OtherDecl { kind, line })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

impl Parser {
    fn item(&self, item: &ModuleItem) -> Declaration {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => self.decl(&export.decl, export.span),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::TsInterfaceDecl(iface) => self.interface(iface),
                _ => self.other("export", export.span),
            },
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => self.other("import", import.span),
            ModuleItem::ModuleDecl(decl) => self.other("export", decl.span()),
            ModuleItem::Stmt(Stmt::Decl(decl)) => self.decl(decl, decl.span()),
            ModuleItem::Stmt(stmt) => self.other("statement", stmt.span()),
        }
    }

    fn decl(&self, decl: &Decl, span: Span) -> Declaration {
        match decl {
            Decl::TsInterface(iface) => self.interface(iface),
            Decl::TsTypeAlias(alias) => self.type_alias(alias),
            Decl::Class(_) => self.other("class", span),
            Decl::Fn(_) => self.other("function", span),
            Decl::Var(var) => {
                let kind = match var.kind {
                    VarDeclKind::Var => "var",
                    VarDeclKind::Let => "let",
                    VarDeclKind::Const => "const",
                };
                self.other(kind, span)
            }
            Decl::TsEnum(_) => self.other("enum", span),
            Decl::TsModule(_) => self.other("namespace", span),
            _ => self.other("declaration", span),
        }
    }

    fn interface(&self, iface: &TsInterfaceDecl) -> Declaration {
        Declaration::Interface(InterfaceDecl {
            name: iface.id.sym.to_string(),
            type_params: type_params(iface.type_params.as_deref()),
            extends: iface.extends.iter().map(|heritage| self.snippet(heritage.span)).collect(),
            members: iface.body.body.iter().map(|member| self.member(member)).collect(),
        })
    }

    fn type_alias(&self, alias: &TsTypeAliasDecl) -> Declaration {
        Declaration::TypeAlias(TypeAliasDecl {
            name: alias.id.sym.to_string(),
            type_params: type_params(alias.type_params.as_deref()),
            ty: self.ty(&alias.type_ann),
        })
    }

    fn member(&self, member: &TsTypeElement) -> Member {
        match member {
            TsTypeElement::TsPropertySignature(prop) => Member::Property(PropertySignature {
                name: property_name(&prop.key, prop.computed),
                optional: prop.optional,
                ty: prop.type_ann.as_ref().map(|ann| self.ty(&ann.type_ann)),
            }),
            TsTypeElement::TsMethodSignature(method) => Member::Method(property_name(&method.key, method.computed)),
            TsTypeElement::TsGetterSignature(getter) => Member::Method(property_name(&getter.key, getter.computed)),
            TsTypeElement::TsSetterSignature(setter) => Member::Method(property_name(&setter.key, setter.computed)),
            TsTypeElement::TsIndexSignature(_) => Member::IndexSignature,
            TsTypeElement::TsCallSignatureDecl(_) => Member::CallSignature,
            TsTypeElement::TsConstructSignatureDecl(_) => Member::ConstructSignature,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

impl Parser {
    fn ty(&self, ty: &TsType) -> TypeExpr {
        match ty {
            TsType::TsKeywordType(keyword) => match keyword_of(keyword.kind) {
                Some(keyword) => TypeExpr::Keyword(keyword),
                None => self.unsupported("keyword", keyword.span),
            },
            TsType::TsThisType(_) => TypeExpr::Keyword(Keyword::This),
            TsType::TsLitType(lit) => match &lit.lit {
                TsLit::Str(s) => TypeExpr::Literal(Literal::String(s.value.to_string())),
                TsLit::Number(_) => TypeExpr::Literal(Literal::Number(self.snippet(lit.span))),
                TsLit::Bool(b) => TypeExpr::Literal(Literal::Boolean(b.value)),
                TsLit::Tpl(_) => self.unsupported("template literal type", lit.span),
                _ => self.unsupported("literal type", lit.span),
            },
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                TypeExpr::Union(union.types.iter().map(|member| self.ty(member)).collect())
            }
            TsType::TsArrayType(array) => TypeExpr::Array(Box::new(self.ty(&array.elem_type))),
            TsType::TsTypeLit(object) => {
                TypeExpr::Object(object.members.iter().map(|member| self.member(member)).collect())
            }
            TsType::TsParenthesizedType(paren) => self.ty(&paren.type_ann),
            TsType::TsTypeRef(reference) => TypeExpr::Reference {
                name: EntityName(entity_parts(&reference.type_name)),
                args: reference
                    .type_params
                    .as_ref()
                    .map(|args| args.params.iter().map(|arg| self.ty(arg)).collect())
                    .unwrap_or_default(),
            },
            other => self.unsupported(kind_of(other), other.span()),
        }
    }

    fn unsupported(&self, kind: &'static str, span: Span) -> TypeExpr {
        TypeExpr::Other { kind, text: self.snippet(span) }
    }
}

fn keyword_of(kind: TsKeywordTypeKind) -> Option<Keyword> {
    Some(match kind {
        TsKeywordTypeKind::TsAnyKeyword => Keyword::Any,
        TsKeywordTypeKind::TsUnknownKeyword => Keyword::Unknown,
        TsKeywordTypeKind::TsNumberKeyword => Keyword::Number,
        TsKeywordTypeKind::TsObjectKeyword => Keyword::Object,
        TsKeywordTypeKind::TsBooleanKeyword => Keyword::Boolean,
        TsKeywordTypeKind::TsBigIntKeyword => Keyword::BigInt,
        TsKeywordTypeKind::TsStringKeyword => Keyword::String,
        TsKeywordTypeKind::TsSymbolKeyword => Keyword::Symbol,
        TsKeywordTypeKind::TsVoidKeyword => Keyword::Void,
        TsKeywordTypeKind::TsUndefinedKeyword => Keyword::Undefined,
        TsKeywordTypeKind::TsNullKeyword => Keyword::Null,
        TsKeywordTypeKind::TsNeverKeyword => Keyword::Never,
        TsKeywordTypeKind::TsIntrinsicKeyword => return None,
    })
}

fn kind_of(ty: &TsType) -> &'static str {
    match ty {
        TsType::TsFnOrConstructorType(_) => "function type",
        TsType::TsTypeQuery(_) => "type query",
        TsType::TsTupleType(_) => "tuple",
        TsType::TsOptionalType(_) | TsType::TsRestType(_) => "tuple element",
        TsType::TsUnionOrIntersectionType(_) => "intersection",
        TsType::TsConditionalType(_) => "conditional type",
        TsType::TsInferType(_) => "infer type",
        TsType::TsTypeOperator(_) => "type operator",
        TsType::TsIndexedAccessType(_) => "indexed access type",
        TsType::TsMappedType(_) => "mapped type",
        TsType::TsTypePredicate(_) => "type predicate",
        TsType::TsImportType(_) => "import type",
        _ => "type",
    }
}

fn entity_parts(name: &TsEntityName) -> Vec<String> {
    match name {
        TsEntityName::Ident(ident) => vec![ident.sym.to_string()],
        TsEntityName::TsQualifiedName(qualified) => {
            let mut parts = entity_parts(&qualified.left);
            parts.push(qualified.right.sym.to_string());
            parts
        }
    }
}

fn property_name(key: &Expr, computed: bool) -> PropertyName {
    if computed {
        return PropertyName::Computed;
    }
    match key {
        Expr::Ident(ident) => PropertyName::Identifier(ident.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => PropertyName::String(s.value.to_string()),
        Expr::Lit(Lit::Num(n)) => PropertyName::Number(n.value.to_string()),
        _ => PropertyName::Computed,
    }
}

fn type_params(decl: Option<&TsTypeParamDecl>) -> Vec<String> {
    decl.map(|decl| decl.params.iter().map(|param| param.name.sym.to_string()).collect())
        .unwrap_or_default()
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
