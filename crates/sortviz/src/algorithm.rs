use std::{fmt, str::FromStr};

/// A sorting algorithm the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bubble,
    Insertion,
    Selection,
    Quick,
    Merge,
}

/// Static description of an algorithm, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
    pub description: &'static str,
}

impl Algorithm {
    /// All algorithms, in menu order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
        Algorithm::Selection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Insertion => "Insertion Sort",
            Algorithm::Selection => "Selection Sort",
            Algorithm::Quick => "Quick Sort",
            Algorithm::Merge => "Merge Sort",
        }
    }

    pub fn info(self) -> &'static AlgorithmInfo {
        match self {
            Algorithm::Bubble => &AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
            },
            Algorithm::Insertion => &AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                description: "Builds the sorted array one item at a time by comparing each with the items before it.",
            },
            Algorithm::Selection => &AlgorithmInfo {
                time_complexity: "O(n²)",
                space_complexity: "O(1)",
                description: "Repeatedly finds the minimum element from the unsorted part and puts it at the beginning.",
            },
            Algorithm::Quick => &AlgorithmInfo {
                time_complexity: "O(n log n)",
                space_complexity: "O(log n)",
                description: "Divides the array into smaller sub-arrays using a pivot element, then recursively sorts the sub-arrays.",
            },
            Algorithm::Merge => &AlgorithmInfo {
                time_complexity: "O(n log n)",
                space_complexity: "O(n)",
                description: "Divides the array into halves, sorts them separately, then merges them back together.",
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm `{0}`, expected one of bubble, insertion, selection, quick, merge")]
pub struct ParseAlgorithmError(String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    /// Accepts `bubble`, `Bubble Sort`, `bubblesort` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let key = lower
            .strip_suffix("sort")
            .map(str::trim_end)
            .unwrap_or(&lower);

        match key {
            "bubble" => Ok(Algorithm::Bubble),
            "insertion" => Ok(Algorithm::Insertion),
            "selection" => Ok(Algorithm::Selection),
            "quick" => Ok(Algorithm::Quick),
            "merge" => Ok(Algorithm::Merge),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_display_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("quick".parse::<Algorithm>(), Ok(Algorithm::Quick));
        assert_eq!(" MergeSort ".parse::<Algorithm>(), Ok(Algorithm::Merge));
        assert!("bogo".parse::<Algorithm>().is_err());
        assert!("sort".parse::<Algorithm>().is_err());
    }

    #[test]
    fn metadata_table() {
        assert_eq!(Algorithm::Quick.info().space_complexity, "O(log n)");
        assert_eq!(Algorithm::Merge.info().space_complexity, "O(n)");
        assert_eq!(Algorithm::Selection.info().time_complexity, "O(n²)");
    }
}
