/*!
 * Common test utilities and caption fixtures for the captionkit test suite
 */

use anyhow::Result;
use captionkit::{CaptionReader, Config, Document, SamiReader};

/// Install a test logger once; later calls are no-ops
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Read SAMI text with the default configuration
pub fn read_sami(content: &str) -> Result<Document> {
    init_test_logging();
    Ok(SamiReader::new(Config::default()).read(content)?)
}

/// Well-formed single-language SAMI with line breaks, italics and blank syncs
pub const SAMPLE_SAMI: &str = r#"<SAMI>
<HEAD>
<TITLE>NOVA3213</TITLE>
<STYLE TYPE="text/css">
<!--
P { margin-left: 1pt; margin-right: 1pt; margin-bottom: 2pt; margin-top: 2pt;
    text-align: center; font-size: 10pt; font-family: Arial; font-weight: normal; font-style: normal; color: #ffffff; }
.ENCC {Name: English; lang: en-US; SAMI_Type: CC;}
-->
</STYLE>
</HEAD>
<BODY>
<SYNC start="9209"><P class="ENCC">
       ( clock ticking )
</P></SYNC>
<SYNC start="12312"><P class="ENCC">&nbsp;</P></SYNC>
<SYNC start="14848"><P class="ENCC">
       MAN:<br/>
       When we think<br/>
       of "E equals m c-squared",
</P></SYNC>
<SYNC start="17000"><P class="ENCC">
       we have this vision of Einstein
</P></SYNC>
<SYNC start="18752"><P class="ENCC">
       <i>as an old, wrinkly man</i><br/>
       with white hair.
</P></SYNC>
<SYNC start="20887"><P class="ENCC">&nbsp;</P></SYNC>
</BODY>
</SAMI>
"#;

/// SRT expected from `SAMPLE_SAMI`
pub const SAMPLE_SRT: &str = "1
00:00:09,209 --> 00:00:12,312
( clock ticking )

2
00:00:14,848 --> 00:00:17,000
MAN:
When we think
of \"E equals m c-squared\",

3
00:00:17,000 --> 00:00:18,752
we have this vision of Einstein

4
00:00:18,752 --> 00:00:20,887
as an old, wrinkly man
with white hair.

";

/// WebVTT expected from `SAMPLE_SAMI`
pub const SAMPLE_WEBVTT: &str = "WEBVTT

00:00:09.209 --> 00:00:12.312
( clock ticking )

00:00:14.848 --> 00:00:17.000
MAN:
When we think
of \"E equals m c-squared\",

00:00:17.000 --> 00:00:18.752
we have this vision of Einstein

00:00:18.752 --> 00:00:20.887
as an old, wrinkly man
with white hair.

";

/// Paragraphs whose class declares no language; the first sync is empty
pub const SAMPLE_SAMI_MISSING_LANGUAGE: &str = r#"
        <SAMI>
        <Head><STYLE TYPE="text/css"></Style></Head>
        <BODY>
        <Sync Start=0><P Class=ENCC></p></sync>
        <Sync Start=1301><P Class=ENCC>>> FUNDING FOR OVERHEARD</p></sync>
        </Body>
        </SAMI>
        "#;

/// Mixed tag case, unquoted attributes, unclosed paragraphs and inline tags
pub const SAMPLE_SAMI_SYNTAX_ERROR: &str = r#"<SAMI>
<Head>
<title>ir2014_rb.smi</title>
<STYLE TYPE="text/css">
<!--
P {margin-left: 16pt; margin-right: 16pt; margin-bottom: 16pt; margin-top: 16pt;
text-align: center; font-size: 18pt; font-family: arial; font-weight: bold; color: #f0f0f0;}
.UNKNOWNCC {Name:Unknown; lang:en-US; SAMIType:CC;}
-->
</STYLE>
</Head>
<BODY>
<SYNC Start=10>
<P Class=UNKNOWNcc>
<font color=#FFFFFF>
The whole city is spread out
<br>in these trees.
</font>
<SYNC Start=4000>
<P Class=UNKNOWNcc>
<font color=#fff>Look at the <i>mountains in the back
</SYNC>
</BODY>
</SAMI>
"#;

/// Two languages sharing syncs, plus a declared language that is never used
pub const SAMPLE_SAMI_MULTI_LANGUAGE: &str = r#"<SAMI><HEAD><STYLE TYPE="text/css"><!--
.ENUSCC {Name: English; lang: en-US;}
.FRFRCC {Name: French; lang: fr-FR; color: #ffff00;}
.DEDECC {Name: German; lang: de-DE;}
--></STYLE></HEAD>
<BODY>
<SYNC Start=1000><P Class=ENUSCC>Hello<P Class=FRFRCC>Bonjour</SYNC>
<SYNC Start=2500><P Class=ENUSCC>&nbsp;<P Class=FRFRCC>Au <b>revoir</b></SYNC>
<SYNC Start=4000><P Class=FRFRCC>&nbsp;</SYNC>
</BODY></SAMI>
"#;

/// Two syncs, the second ending at end of media
pub const SAMPLE_SAMI_TWO_SYNCS: &str = r#"<SAMI><BODY>
<SYNC Start=0><P>First line &gt; here</P></SYNC>
<SYNC Start=1301><P>Second line</P></SYNC>
</BODY></SAMI>"#;

/// SRT with a malformed block, CRLF line endings and inline tags
pub const SAMPLE_SRT_MESSY: &str = "1\r\n00:00:01,000 --> 00:00:02,500\r\n<i>Hello</i> there\r\n\r\n2\r\nnot a timing line\r\nlost text\r\n\r\n3\r\n00:00:03.000 --> 00:00:04.000\r\nLine one\r\n<b>Line two</b>\r\n";
