use std::collections::BTreeMap;

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

struct Pattern {
    text: String,
    span: Span,
    primary: u8,
    mask: u16,
    value: u16,
}

impl Pattern {
    fn parse(literal: &LitStr) -> Result<Self> {
        let text = literal.value();
        let span = literal.span();
        let nibbles: Vec<char> = text.chars().collect();
        if nibbles.len() != 4 {
            return Err(Error::new(span, "opcode pattern must be exactly 4 nibbles"));
        }

        let primary = nibbles[0]
            .to_digit(16)
            .ok_or_else(|| Error::new(span, "first nibble of an opcode pattern must be hex"))?
            as u8;

        let mut mask: u16 = 0;
        let mut value: u16 = 0;
        for (i, nibble) in nibbles.iter().enumerate() {
            let shift = 12 - 4 * i;
            if let Some(digit) = nibble.to_digit(16) {
                mask |= 0xF << shift;
                value |= (digit as u16) << shift;
            } else if !matches!(nibble, 'x' | 'y' | 'n') {
                return Err(Error::new(
                    span,
                    format!("unexpected `{nibble}` in opcode pattern, expected a hex digit, x, y or n"),
                ));
            }
        }

        Ok(Self {
            text,
            span,
            primary,
            mask,
            value,
        })
    }

    fn overlaps(&self, other: &Pattern) -> bool {
        (self.value ^ other.value) & (self.mask & other.mask) == 0
    }

    fn extract(&self, field: &Ident) -> Result<TokenStream2> {
        let name = field.to_string();
        let (start, end, extraction) = match name.as_str() {
            "x" => (1, 2, quote!((word >> 8) & 0xF)),
            "y" => (2, 3, quote!((word >> 4) & 0xF)),
            "n" => (3, 4, quote!(word & 0xF)),
            "nn" => (2, 4, quote!(word & 0xFF)),
            "nnn" => (1, 4, quote!(word & 0xFFF)),
            other => {
                return Err(Error::new(
                    field.span(),
                    format!("unknown opcode field `{other}`, expected x, y, n, nn or nnn"),
                ))
            }
        };

        let letter = name.as_bytes()[0];
        let nibbles = self.text.as_bytes();
        let covered = nibbles[start..end].iter().all(|c| *c == letter);
        let longer_run = start > 0 && nibbles[start - 1] == letter && letter == b'n';
        if !covered || longer_run {
            return Err(Error::new(
                field.span(),
                format!("field `{name}` does not match opcode pattern \"{}\"", self.text),
            ));
        }

        Ok(quote!((#extraction) as _))
    }
}

/// Builds the opcode decoder for an instruction enum.
///
/// Every variant carries `#[opcode("..")]`: four nibbles, each either a hex
/// digit that must match or one of the field letters `x`, `y`, `n`. Named
/// variant fields (`x`, `y`, `n`, `nn`, `nnn`) are filled from the matching
/// bits of the opcode.
#[proc_macro_derive(Decode, attributes(opcode))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Decode can only be derived for enums",
        ));
    };

    let mut patterns: Vec<Pattern> = vec![];
    let mut groups: BTreeMap<u8, Vec<TokenStream2>> = BTreeMap::new();
    let mut pattern_arms = vec![];

    for variant in &data.variants {
        let attribute = variant
            .attrs
            .iter()
            .find(|attribute| attribute.path().is_ident("opcode"))
            .ok_or_else(|| Error::new_spanned(&variant.ident, "missing #[opcode(\"..\")]"))?;
        let literal: LitStr = attribute.parse_args()?;
        let pattern = Pattern::parse(&literal)?;

        if let Some(previous) = patterns.iter().find(|p| p.overlaps(&pattern)) {
            return Err(Error::new(
                pattern.span,
                format!(
                    "opcode pattern \"{}\" overlaps \"{}\"",
                    pattern.text, previous.text
                ),
            ));
        }

        let ident = &variant.ident;
        let constructor = match &variant.fields {
            Fields::Unit => quote!(Self::#ident),
            Fields::Named(fields) => {
                let mut initializers = vec![];
                for field in &fields.named {
                    let name = field.ident.as_ref().expect("named field");
                    let extraction = pattern.extract(name)?;
                    initializers.push(quote!(#name: #extraction));
                }
                quote!(Self::#ident { #(#initializers),* })
            }
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &variant.fields,
                    "instruction operands must be named fields",
                ))
            }
        };

        let mask = Literal::u16_unsuffixed(pattern.mask);
        let value = Literal::u16_unsuffixed(pattern.value);
        groups.entry(pattern.primary).or_default().push(quote! {
            if (word & #mask) == #value {
                return ::core::option::Option::Some(#constructor);
            }
        });

        let text = &pattern.text;
        pattern_arms.push(quote!(Self::#ident { .. } => #text));

        patterns.push(pattern);
    }

    let primaries: Vec<Literal> = groups
        .keys()
        .map(|primary| Literal::u16_unsuffixed(*primary as u16))
        .collect();
    let tests: Vec<Vec<TokenStream2>> = groups.into_values().collect();
    let texts = patterns.iter().map(|pattern| &pattern.text);
    let count = patterns.len();

    let name = &input.ident;
    let (impl_generics, type_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #name #type_generics #where_clause {
            /// Every opcode pattern, in declaration order.
            pub const PATTERNS: [&'static str; #count] = [#(#texts),*];

            /// Matches a raw opcode word against the instruction table.
            pub fn decode(word: u16) -> ::core::option::Option<Self> {
                match word >> 12 {
                    #(#primaries => {
                        #(#tests)*
                        ::core::option::Option::None
                    })*
                    _ => ::core::option::Option::None,
                }
            }

            /// The opcode pattern this instruction was decoded from.
            pub fn pattern(&self) -> &'static str {
                match self {
                    #(#pattern_arms),*
                }
            }
        }
    })
}
