// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clap::Parser;

use crate::Args;

fn parse(args: &[&str]) -> Result<Args, clap::Error> {
    Args::try_parse_from(std::iter::once("achievement-log-server").chain(args.iter().copied()))
}

#[test]
fn test_session_days_defaults_to_thirty() {
    let args: Args = parse(&[]).unwrap();
    assert_eq!(args.session_days, 30);
    assert_eq!(args.port, 5000);
}

#[test]
fn test_session_days_outside_range_is_rejected() {
    for value in ["0", "-1", "3651", "9223372036854775807"] {
        assert!(
            parse(&["--session-days", value]).is_err(),
            "{value} should be rejected"
        );
    }
    assert_eq!(parse(&["--session-days", "3650"]).unwrap().session_days, 3650);
}
