//! Groups visualization outputs by swing recording.
//!
//! Output names look like `<prefix>_<NNNN>.jpg_vis_results.jpg`, where the
//! prefix identifies the recording and `NNNN` is the frame number.

/// Text that must follow the four-digit frame number.
const NAME_TAIL: &str = ".jpg_vis_results.jpg";
const FRAME_DIGITS: usize = 4;

/// All frames sharing one prefix, in the order they were listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameGroup {
    pub prefix: String,
    pub frames: Vec<(u32, String)>,
}

impl FrameGroup {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Splits a name into `(prefix, frame_number)`.
///
/// Matching starts at the beginning of the name and picks the shortest
/// non-empty prefix; anything after the `.jpg_vis_results.jpg` tail is
/// ignored.
pub fn parse_frame_name(name: &str) -> Option<(&str, u32)> {
    for (i, _) in name.match_indices('_') {
        if i == 0 {
            continue;
        }
        let rest = &name[i + 1..];
        let Some(digits) = rest.get(..FRAME_DIGITS) else {
            continue;
        };
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if rest[FRAME_DIGITS..].starts_with(NAME_TAIL) {
            let number = digits.parse().ok()?;
            return Some((&name[..i], number));
        }
    }
    None
}

/// Groups matching names by prefix; non-matching names are dropped.
///
/// Groups appear in order of their first member; members keep input order.
pub fn group_frames<I, S>(names: I) -> Vec<FrameGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<FrameGroup> = Vec::new();
    for name in names {
        let name = name.as_ref();
        let Some((prefix, number)) = parse_frame_name(name) else {
            continue;
        };
        let entry = (number, name.to_string());
        match groups.iter_mut().find(|g| g.prefix == prefix) {
            Some(group) => group.frames.push(entry),
            None => groups.push(FrameGroup {
                prefix: prefix.to_string(),
                frames: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("swing1_0003.jpg_vis_results.jpg", Some(("swing1", 3)))]
    #[case("a_b_0012.jpg_vis_results.jpg", Some(("a_b", 12)))]
    #[case("p_0001_0002.jpg_vis_results.jpg", Some(("p_0001", 2)))]
    #[case("x_9999.jpg_vis_results.jpg.bak", Some(("x", 9999)))]
    #[case("_0001.jpg_vis_results.jpg", None)]
    #[case("swing1_003.jpg_vis_results.jpg", None)]
    #[case("swing1_00003.jpg_vis_results.jpg", None)]
    #[case("swing1_0003.jpg", None)]
    #[case("swing1_0003.png_vis_results.jpg", None)]
    #[case("swing1-0003.jpg_vis_results.jpg", None)]
    #[case("notes.txt", None)]
    fn test_parse_frame_name(#[case] name: &str, #[case] expected: Option<(&str, u32)>) {
        assert_eq!(parse_frame_name(name), expected);
    }

    #[test]
    fn test_parse_handles_multibyte_prefix() {
        assert_eq!(
            parse_frame_name("スイング_0007.jpg_vis_results.jpg"),
            Some(("スイング", 7))
        );
    }

    #[test]
    fn test_group_frames_by_prefix_in_first_seen_order() {
        let groups = group_frames([
            "b_0002.jpg_vis_results.jpg",
            "a_0001.jpg_vis_results.jpg",
            "b_0001.jpg_vis_results.jpg",
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].prefix, "b");
        assert_eq!(
            groups[0].frames,
            vec![
                (2, "b_0002.jpg_vis_results.jpg".to_string()),
                (1, "b_0001.jpg_vis_results.jpg".to_string()),
            ]
        );
        assert_eq!(groups[1].prefix, "a");
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_group_frames_ignores_non_matching_names() {
        let groups = group_frames(["readme.jpg", "frame.jpg_vis_results.jpg"]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_group_frames_empty_input() {
        let names: Vec<String> = Vec::new();
        assert!(group_frames(names).is_empty());
    }
}
