use std::io::Write;

use crate::problem::event_sequence::EventSequence;

use super::extractor::DinnerSchedule;

/// Writes one row per group with the host it visits in every hosted round,
/// below a header of the round labels. Fields are quoted and separated by `;`.
pub fn write_schedule_csv<W: Write>(
    events: &EventSequence,
    schedule: &DinnerSchedule,
    writer: W,
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    writer.write_record(
        std::iter::once("Group").chain(events.hosted_rounds().map(|round| events.label(round))),
    )?;

    for itinerary in &schedule.itineraries {
        writer.write_record(
            std::iter::once(itinerary.group.as_str())
                .chain(itinerary.visits.iter().map(|visit| visit.host.as_str())),
        )?;
    }

    writer.flush()?;
    Ok(())
}
