//! `TupleArray` derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Member, Type, parse2};

/// Largest number of fields accepted. Must equal `promq_core::tuple::MAX_ARITY`;
/// generated code asserts it does not exceed it.
const MAX_ARITY: usize = 7;

/// A struct field in declaration order.
struct TupleField<'a> {
    member: Member,
    ty: &'a Type,
}

/// Expand the `#[derive(TupleArray)]` macro.
pub fn expand_tuple_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "TupleArray derive does not support generic structs",
        ));
    }

    let fields = collect_fields(&input)?;
    let arity = fields.len();
    if arity == 0 || arity > MAX_ARITY {
        return Err(syn::Error::new_spanned(
            &input,
            format!("TupleArray derive supports 1 to {MAX_ARITY} fields, found {arity}"),
        ));
    }

    let serialize_elements = fields.iter().map(|TupleField { member, .. }| {
        quote! {
            ::promq::serde::ser::SerializeTuple::serialize_element(tuple, &self.#member)?;
        }
    });
    let decode_elements = fields.iter().map(|TupleField { member, ty }| {
        quote! { #member: fields.field::<#ty>()?, }
    });

    Ok(quote! {
        const _: () = ::core::assert!(
            #arity <= ::promq::MAX_ARITY,
            "TupleArray derive accepted more fields than the tuple codec supports",
        );

        impl ::promq::TupleShape for #name {
            const ARITY: usize = #arity;

            fn serialize_fields<S: ::promq::serde::ser::SerializeTuple>(
                &self,
                tuple: &mut S,
            ) -> ::core::result::Result<(), S::Error> {
                #(#serialize_elements)*
                ::core::result::Result::Ok(())
            }

            fn decode_fields(
                fields: &mut ::promq::FieldReader,
            ) -> ::core::result::Result<Self, ::promq::CodecError> {
                ::core::result::Result::Ok(Self {
                    #(#decode_elements)*
                })
            }
        }

        impl ::promq::serde::Serialize for #name {
            fn serialize<S: ::promq::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error> {
                ::promq::tuple::serialize(self, serializer)
            }
        }

        impl<'de> ::promq::serde::Deserialize<'de> for #name {
            fn deserialize<D: ::promq::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error> {
                ::promq::tuple::deserialize(deserializer)
            }
        }
    })
}

/// Collect named or positional fields of a struct.
fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<TupleField<'_>>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "TupleArray derive only supports structs",
        ));
    };

    match &data.fields {
        Fields::Named(fields) => Ok(fields
            .named
            .iter()
            .filter_map(|field| {
                field.ident.clone().map(|ident| TupleField {
                    member: Member::Named(ident),
                    ty: &field.ty,
                })
            })
            .collect()),
        Fields::Unnamed(fields) => Ok(fields
            .unnamed
            .iter()
            .enumerate()
            .map(|(index, field)| TupleField {
                member: Member::from(index),
                ty: &field.ty,
            })
            .collect()),
        Fields::Unit => Err(syn::Error::new_spanned(
            input,
            "TupleArray derive does not support unit structs",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> String {
        expand_tuple_derive(input).expect("expand").to_string()
    }

    fn expand_err(input: TokenStream) -> String {
        expand_tuple_derive(input)
            .expect_err("should be rejected")
            .to_string()
    }

    #[test]
    fn named_struct() {
        let output = expand(quote! {
            struct Sample {
                timestamp: f64,
                value: String,
            }
        });

        assert!(output.contains("impl :: promq :: TupleShape for Sample"));
        assert!(output.contains("const ARITY : usize = 2usize"));
        assert!(output.contains("serialize_element (tuple , & self . timestamp)"));
        assert!(output.contains("timestamp : fields . field :: < f64 > () ?"));
        assert!(output.contains("value : fields . field :: < String > () ?"));
        assert!(output.contains("impl :: promq :: serde :: Serialize for Sample"));
        assert!(output.contains("impl < 'de > :: promq :: serde :: Deserialize < 'de > for Sample"));
    }

    #[test]
    fn tuple_struct() {
        let output = expand(quote! {
            struct Point(f64, String, bool);
        });

        assert!(output.contains("const ARITY : usize = 3usize"));
        assert!(output.contains("& self . 0"));
        assert!(output.contains("& self . 2"));
        assert!(output.contains("1 : fields . field :: < String > () ?"));
    }

    #[test]
    fn fields_keep_declaration_order() {
        let output = expand(quote! {
            struct Ordered {
                z: u8,
                a: u8,
                m: u8,
            }
        });

        let z = output.find("& self . z").expect("z");
        let a = output.find("& self . a").expect("a");
        let m = output.find("& self . m").expect("m");
        assert!(z < a && a < m);
    }

    #[test]
    fn seven_fields_accepted() {
        let output = expand(quote! {
            struct Wide(u8, u8, u8, u8, u8, u8, u8);
        });
        assert!(output.contains("const ARITY : usize = 7usize"));
        assert!(output.contains("7usize <= :: promq :: MAX_ARITY"));
    }

    #[test]
    fn eight_fields_rejected() {
        let err = expand_err(quote! {
            struct TooWide(u8, u8, u8, u8, u8, u8, u8, u8);
        });
        assert_eq!(err, "TupleArray derive supports 1 to 7 fields, found 8");
    }

    #[test]
    fn empty_struct_rejected() {
        let err = expand_err(quote! {
            struct Empty {}
        });
        assert_eq!(err, "TupleArray derive supports 1 to 7 fields, found 0");
    }

    #[test]
    fn unit_struct_rejected() {
        let err = expand_err(quote! {
            struct Unit;
        });
        assert_eq!(err, "TupleArray derive does not support unit structs");
    }

    #[test]
    fn enum_rejected() {
        let err = expand_err(quote! {
            enum Kind { A(u8) }
        });
        assert_eq!(err, "TupleArray derive only supports structs");
    }

    #[test]
    fn generics_rejected() {
        let err = expand_err(quote! {
            struct Pair<T> { left: T, right: T }
        });
        assert_eq!(err, "TupleArray derive does not support generic structs");
    }
}
