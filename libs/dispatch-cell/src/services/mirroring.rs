use shared_models::dispatch::CallStatus;
use shared_models::fleet::AmbulanceStatus;

/// Ambulance status that follows each call status. Call statuses missing
/// from the table leave the assigned ambulance untouched.
pub const STATUS_MIRROR: [(CallStatus, AmbulanceStatus); 4] = [
    (CallStatus::Completed, AmbulanceStatus::Available),
    (CallStatus::EnRoute, AmbulanceStatus::EnRoute),
    (CallStatus::AtScene, AmbulanceStatus::AtScene),
    (CallStatus::Transporting, AmbulanceStatus::Transporting),
];

pub fn mirrored_status(call_status: &CallStatus) -> Option<AmbulanceStatus> {
    STATUS_MIRROR
        .iter()
        .find(|(status, _)| status == call_status)
        .map(|(_, ambulance_status)| *ambulance_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_call_statuses() {
        assert_eq!(mirrored_status(&CallStatus::Completed), Some(AmbulanceStatus::Available));
        assert_eq!(mirrored_status(&CallStatus::EnRoute), Some(AmbulanceStatus::EnRoute));
        assert_eq!(mirrored_status(&CallStatus::AtScene), Some(AmbulanceStatus::AtScene));
        assert_eq!(mirrored_status(&CallStatus::Transporting), Some(AmbulanceStatus::Transporting));
    }

    #[test]
    fn other_statuses_leave_ambulance_alone() {
        assert_eq!(mirrored_status(&CallStatus::Pending), None);
        assert_eq!(mirrored_status(&CallStatus::Assigned), None);
        assert_eq!(mirrored_status(&CallStatus::Cancelled), None);
        assert_eq!(mirrored_status(&CallStatus::Other("on_hold".to_string())), None);
    }

    #[test]
    fn every_known_status_is_looked_up_once_at_most() {
        for status in CallStatus::KNOWN.iter() {
            let hits = STATUS_MIRROR.iter().filter(|(s, _)| s == status).count();
            assert!(hits <= 1, "{} mirrored more than once", status);
        }
    }
}
