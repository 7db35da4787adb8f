//! Library defining cross library utilities that can be implemented using `#![no_std]`
#![no_std]

// The macros are `#[macro_export]`, so they already live at the crate root
mod helper_macros;

#[cfg(test)]
mod tests {
    #[test]
    fn count_exprs_counts_every_expression() {
        assert_eq!(crate::count_exprs!(), 0);
        assert_eq!(crate::count_exprs!(1), 1);
        assert_eq!(crate::count_exprs!(1, 2, 3,), 3);
        assert_eq!(crate::count_exprs!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22), 23);
    }

    #[test]
    fn count_tt_counts_token_trees() {
        assert_eq!(crate::count_tt!(), 0);
        assert_eq!(crate::count_tt!(a b (c d) [e]), 4);
    }

    #[test]
    fn func_name_names_the_enclosing_function() {
        let name = crate::func_name!();
        assert!(name.ends_with("func_name_names_the_enclosing_function"));
    }
}
