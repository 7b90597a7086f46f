// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for `StyleValueCollection` against a map model.

use std::collections::BTreeMap;

use canopy_style::{StyleKeyword, StylePropertyId, StyleValue, StyleValueCollection};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Set(usize, f32),
    Keyword(usize, StyleKeyword),
    Remove(usize),
}

fn keyword_strategy() -> impl Strategy<Value = StyleKeyword> {
    prop_oneof![
        Just(StyleKeyword::Null),
        Just(StyleKeyword::Auto),
        Just(StyleKeyword::Initial),
        Just(StyleKeyword::Inherit),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let ids = 0..StylePropertyId::ALL.len();
    prop_oneof![
        (ids.clone(), -100.0f32..100.0).prop_map(|(i, v)| Op::Set(i, v)),
        (ids.clone(), keyword_strategy()).prop_map(|(i, k)| Op::Keyword(i, k)),
        ids.prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn matches_map_model(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut values = StyleValueCollection::new();
        let mut model: BTreeMap<StylePropertyId, StyleValue> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Set(i, v) => {
                    let value = StyleValue::float(StylePropertyId::ALL[i], v);
                    model.insert(value.id, value.clone());
                    values.set_style_value(value);
                }
                Op::Keyword(i, keyword) => {
                    let id = StylePropertyId::ALL[i];
                    if keyword == StyleKeyword::Null {
                        model.remove(&id);
                    } else {
                        model.insert(id, StyleValue::keyword(id, keyword));
                    }
                    values.set_style_value(StyleValue::keyword(id, keyword));
                }
                Op::Remove(i) => {
                    let id = StylePropertyId::ALL[i];
                    prop_assert_eq!(values.remove(id), model.remove(&id));
                }
            }
        }

        prop_assert_eq!(values.len(), model.len());
        prop_assert!(values.iter().all(|v| v.keyword != StyleKeyword::Null));
        for id in StylePropertyId::ALL {
            prop_assert_eq!(values.try_get_style_value(id), model.get(&id));
        }
    }
}
