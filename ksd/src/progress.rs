use kdam::{Bar, tqdm};
use std::io::{IsTerminal, stderr};

/// Progress bar for one phase of a run. Hidden when stderr isn't a terminal.
pub fn bar(desc: &str, total: usize, unit: &str) -> Bar {
    tqdm!(
        total = total,
        desc = desc.to_owned(),
        unit = unit.to_owned(),
        dynamic_ncols = true,
        disable = !stderr().is_terminal()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdam::BarExt;

    #[test]
    fn test_bar_counts() {
        let mut pb = bar("Episodes", 3, " ep");
        assert_eq!(pb.total, 3);
        assert!(pb.update(2).is_ok());
    }
}
