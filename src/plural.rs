//! Russian plural forms for item counts.

const ITEM_FORMS: [&str; 3] = ["элемент", "элемента", "элементов"];

/// Index into a three-form table: one / few / many.
///
/// `1, 21, 101` take the first form, `2..4, 22..24` the second, and
/// everything else (including `11..14`) the third.
pub fn plural_form_index(count: u64) -> usize {
    let mod10 = count % 10;
    let mod100 = count % 100;
    if mod10 == 1 && mod100 != 11 {
        0
    } else if (2..=4).contains(&mod10) && !(10..20).contains(&mod100) {
        1
    } else {
        2
    }
}

pub fn pluralize_items(count: u64) -> &'static str {
    ITEM_FORMS[plural_form_index(count)]
}

/// `"<count> <form>"`, e.g. `"21 элемент"`.
pub fn item_count_label(count: u64) -> String {
    format!("{count} {}", pluralize_items(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_forms() {
        assert_eq!(pluralize_items(1), "элемент");
        assert_eq!(pluralize_items(2), "элемента");
        assert_eq!(pluralize_items(5), "элементов");
        assert_eq!(pluralize_items(0), "элементов");
    }

    #[test]
    fn teens_take_many_form() {
        for n in 11..=14 {
            assert_eq!(pluralize_items(n), "элементов", "count {n}");
        }
        assert_eq!(pluralize_items(111), "элементов");
        assert_eq!(pluralize_items(112), "элементов");
    }

    #[test]
    fn compound_numbers_follow_last_digit() {
        assert_eq!(pluralize_items(21), "элемент");
        assert_eq!(pluralize_items(22), "элемента");
        assert_eq!(pluralize_items(25), "элементов");
        assert_eq!(pluralize_items(101), "элемент");
        assert_eq!(pluralize_items(104), "элемента");
    }

    #[test]
    fn label_includes_count() {
        assert_eq!(item_count_label(3), "3 элемента");
    }
}
