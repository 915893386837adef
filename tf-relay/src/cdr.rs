/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! CDR payload codec with the 4-byte RTPS encapsulation header.

use byteorder::{BigEndian, LittleEndian};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::RelayError;

const ENCAPSULATION_HEADER_LEN: usize = 4;

/// Representation identifier for plain CDR, big endian.
pub const CDR_BE: [u8; 2] = [0x00, 0x00];
/// Representation identifier for plain CDR, little endian.
pub const CDR_LE: [u8; 2] = [0x00, 0x01];

/// Encodes `value` as little-endian CDR, prefixed with its encapsulation header.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, RelayError> {
    let body = cdr_encoding::to_vec::<T, LittleEndian>(value)
        .map_err(|err| RelayError::Cdr(err.to_string()))?;

    let mut payload = Vec::with_capacity(ENCAPSULATION_HEADER_LEN + body.len());
    payload.extend_from_slice(&CDR_LE);
    // options
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// Decodes a CDR payload, honoring the byte order announced by its encapsulation header.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, RelayError> {
    if payload.len() < ENCAPSULATION_HEADER_LEN {
        return Err(RelayError::Cdr(format!(
            "payload of {} bytes is shorter than the encapsulation header",
            payload.len()
        )));
    }

    let (header, body) = payload.split_at(ENCAPSULATION_HEADER_LEN);
    let representation = [header[0], header[1]];

    let decoded = match representation {
        CDR_LE => cdr_encoding::from_bytes::<T, LittleEndian>(body),
        CDR_BE => cdr_encoding::from_bytes::<T, BigEndian>(body),
        other => {
            return Err(RelayError::Cdr(format!(
                "unsupported representation identifier {other:02x?}"
            )))
        }
    };

    decoded
        .map(|(value, _consumed)| value)
        .map_err(|err| RelayError::Cdr(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgs::builtin_interfaces::Time;
    use crate::msgs::geometry_msgs::{Point, Quaternion};
    use crate::msgs::nav_msgs::Odometry;
    use crate::msgs::std_msgs::Header;

    #[test]
    fn encode_prefixes_little_endian_header() {
        let payload = encode(&Time::new(1, 2)).unwrap();
        assert_eq!(payload, vec![0, 1, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn decode_big_endian_payload() {
        let payload = [0, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0, 9];
        let time: Time = decode(&payload).unwrap();
        assert_eq!(time, Time::new(7, 9));
    }

    #[test]
    fn header_string_is_length_prefixed_with_terminator() {
        let payload = encode(&Header::new(Time::new(0, 0), "map")).unwrap();
        // sec, nanosec, then u32 length including the trailing NUL
        assert_eq!(&payload[12..16], &[4, 0, 0, 0]);
        assert_eq!(&payload[16..20], b"map\0");
    }

    #[test]
    fn odometry_survives_encoding() {
        let mut odometry = Odometry {
            header: Header::new(Time::new(12, 34), "odom"),
            child_frame_id: "base_link".to_string(),
            ..Default::default()
        };
        odometry.pose.pose.position = Point::new(1.0, -2.0, 0.5);
        odometry.pose.pose.orientation = Quaternion::new(0.0, 0.0, 0.7071, 0.7071);
        odometry.pose.covariance[35] = 0.25;
        odometry.twist.covariance[0] = 1.5;

        let decoded: Odometry = decode(&encode(&odometry).unwrap()).unwrap();
        assert_eq!(decoded, odometry);
    }

    #[test]
    fn decode_rejects_short_payload() {
        let err = decode::<Time>(&[0, 1]).unwrap_err();
        assert!(matches!(err, RelayError::Cdr(_)));
    }

    #[test]
    fn decode_rejects_unknown_representation() {
        let err = decode::<Time>(&[0, 7, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]).unwrap_err();
        assert!(err.to_string().contains("unsupported representation"));
    }

    #[test]
    fn decode_rejects_truncated_body() {
        let mut payload = encode(&Odometry::default()).unwrap();
        payload.truncate(payload.len() - 8);
        assert!(decode::<Odometry>(&payload).is_err());
    }
}
