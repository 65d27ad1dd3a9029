//! Per-utterance features for predicting who acts next.

use serde::Serialize;
use wildcard_engine::Card;

use crate::{
    FeatureError,
    annotation::{AnnotationRecord, Label, extract_card},
    edit_distance::{FeatureConfig, parse_hand, score_hands},
    hand::free_hand_strategic,
    window::CardWindow,
};

/// Features of one annotated utterance, seen from its speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtteranceFeatures {
    pub line: usize,
    /// Edits needed by both players together to complete the best window.
    pub edit: usize,
    pub speaker_edit: i32,
    pub addressee_edit: i32,
    pub speaker_all_in_window: bool,
    pub addressee_all_in_window: bool,
    pub speaker_full_hand: bool,
    pub addressee_full_hand: bool,
    /// The speaker's hand is full while the addressee's is not.
    pub hand_imbalance: bool,
    /// Some player's NEED annotation names the card of interest.
    pub coi_needed: bool,
    pub optimal_window: CardWindow,
    pub label: Label,
}

impl UtteranceFeatures {
    pub fn from_record(
        record: &AnnotationRecord,
        config: &FeatureConfig,
    ) -> Result<Self, FeatureError> {
        let speaker = record.speaker;
        let addressee = record.addressee();
        let coi: Card = record.coi.parse()?;
        let hands = [parse_hand(&record.hands[0])?, parse_hand(&record.hands[1])?];
        let edit = score_hands([hands[0].as_slice(), hands[1].as_slice()], coi, config)?;

        let speaker_full_hand = !free_hand_strategic(&hands[speaker.index()])?;
        let addressee_full_hand = !free_hand_strategic(&hands[addressee.index()])?;

        Ok(Self {
            line: record.line,
            edit: edit.min_edit,
            speaker_edit: edit.player_edit(speaker),
            addressee_edit: edit.player_edit(addressee),
            speaker_all_in_window: edit.all_in_window(speaker),
            addressee_all_in_window: edit.all_in_window(addressee),
            speaker_full_hand,
            addressee_full_hand,
            hand_imbalance: speaker_full_hand && !addressee_full_hand,
            coi_needed: coi_needed(record, coi),
            optimal_window: edit.optimal_window,
            label: record.label,
        })
    }
}

/// Checks the NEED entries of both players for the card of interest.
/// A wildcard entry such as `NEED(XH)` matches any card of its suit.
fn coi_needed(record: &AnnotationRecord, coi: Card) -> bool {
    record
        .need
        .iter()
        .flatten()
        .filter_map(|entry| {
            let id = extract_card(entry)?;
            match id.parse::<Card>() {
                Ok(card) => Some(card),
                Err(e) => {
                    log::debug!("line {}: ignoring NEED entry '{entry}': {e}", record.line);
                    None
                }
            }
        })
        .any(|needed| needed == coi || (needed.is_wildcard() && needed.suit() == coi.suit()))
}

#[cfg(test)]
mod tests {
    use crate::annotation::parse_annotations;

    use super::*;

    const ROWS: &str = "\
Player 1,20,CHAT_MESSAGE_PREFIX,i have 4h and 5h,2H;3H;4H,6D;7D,,,EXISTS(5H),,,NEED(XH),,,,P2:31
Player 2,30,CHAT_MESSAGE_PREFIX,got them,3H;4H;5H,,,,,EXISTS(5H),NEED(5H),,,,,P2:40
Player 2,35,CHAT_MESSAGE_PREFIX,hm,3H;4H;9C,JS;QS;KS,,,,EXISTS(QS),NEED(2C),,,,,NONE
";

    fn features() -> Vec<UtteranceFeatures> {
        parse_annotations(ROWS.as_bytes())
            .unwrap()
            .iter()
            .map(|r| UtteranceFeatures::from_record(r, &FeatureConfig::default()).unwrap())
            .collect()
    }

    #[test]
    fn test_features_follow_speaker() {
        let features = features();
        assert_eq!(features.len(), 3);

        let first = &features[0];
        assert_eq!(first.edit, 4);
        assert_eq!((first.speaker_edit, first.addressee_edit), (2, 5));
        assert!(!first.speaker_all_in_window);
        assert!(first.speaker_full_hand);
        assert!(!first.addressee_full_hand);
        assert!(first.hand_imbalance);
        assert!(first.coi_needed);
        assert_eq!(first.optimal_window.to_string(), "{3H,4H,5H}");
        assert_eq!(first.label, Label::Addressee);

        // speaker is player 2, who holds nothing
        let second = &features[1];
        assert_eq!(second.edit, 0);
        assert_eq!((second.speaker_edit, second.addressee_edit), (3, 0));
        assert!(second.speaker_all_in_window && second.addressee_all_in_window);
        assert!(!second.speaker_full_hand);
        assert!(second.addressee_full_hand);
        assert!(second.coi_needed);
        assert_eq!(second.label, Label::Speaker);
    }

    #[test]
    fn test_hand_imbalance() {
        let third = &features()[2];
        assert!(third.speaker_full_hand);
        assert!(!third.addressee_full_hand);
        assert!(third.hand_imbalance);
        assert!(!third.coi_needed);
        assert_eq!(third.optimal_window.to_string(), "{JS,QS,KS}");
        assert_eq!(third.edit, 3);
    }

    #[test]
    fn test_unparseable_card_of_interest() {
        let row = "Player 1,1,CHAT_MESSAGE_PREFIX,x,,,,,EXISTS(5Z),,,,,,,P1\n";
        let records = parse_annotations(row.as_bytes()).unwrap();
        assert!(matches!(
            UtteranceFeatures::from_record(&records[0], &FeatureConfig::default()),
            Err(FeatureError::Card { .. })
        ));
    }
}
