// ID3v2.3 / v2.4 frame ids

pub(super) const ID_PREFIX: &str = "id3/";

pub(super) const FRAMES: &[(&str, &str)] = &[
    ("AENC", "Audio Encryption"),
    ("APIC", "Attached Picture"),
    ("ASPI", "Audio Seek Point Index"),
    ("COMM", "Comments"),
    ("COMR", "Commercial"),
    ("ENCR", "Encryption Method Registration"),
    ("EQU2", "Equalization"),
    ("EQUA", "Equalization"),
    ("ETCO", "Event Timing Codes"),
    ("GEOB", "General Encapsulated Object"),
    ("GRID", "Group Identification Registration"),
    ("IPLS", "Involved People List"),
    ("LINK", "Linked Information"),
    ("MCDI", "Music CD Identifier"),
    ("MLLT", "MPEG Location Lookup Table"),
    ("OWNE", "Ownership"),
    ("PCNT", "Play Counter"),
    ("POPM", "Popularimeter"),
    ("POSS", "Position Synchronization"),
    ("PRIV", "Private"),
    ("RBUF", "Recommended Buffer Size"),
    ("RVA2", "Relative Volume Adjustment"),
    ("RVAD", "Relative Volume Adjustment"),
    ("RVRB", "Reverb"),
    ("SEEK", "Seek"),
    ("SIGN", "Signature"),
    ("SYLT", "Synchronized Lyrics"),
    ("SYTC", "Synchronized Tempo Codes"),
    ("TALB", "Album"),
    ("TBPM", "BPM"),
    ("TCMP", "Compilation"),
    ("TCOM", "Composer"),
    ("TCON", "Genre"),
    ("TCOP", "Copyright"),
    ("TDAT", "Date"),
    ("TDEN", "Encoding Time"),
    ("TDLY", "Playlist Delay"),
    ("TDOR", "Original Release Time"),
    ("TDRC", "Recording Time"),
    ("TDRL", "Release Time"),
    ("TDTG", "Tagging Time"),
    ("TENC", "Encoded By"),
    ("TEXT", "Lyricist"),
    ("TFLT", "File Type"),
    ("TIME", "Time"),
    ("TIPL", "Involved People"),
    ("TIT1", "Grouping"),
    ("TIT2", "Title"),
    ("TIT3", "Subtitle"),
    ("TKEY", "Initial Key"),
    ("TLAN", "Language"),
    ("TLEN", "Length"),
    ("TMCL", "Musician Credits"),
    ("TMED", "Media Type"),
    ("TMOO", "Mood"),
    ("TOAL", "Original Album"),
    ("TOFN", "Original Filename"),
    ("TOLY", "Original Lyricist"),
    ("TOPE", "Original Artist"),
    ("TORY", "Original Release Year"),
    ("TOWN", "File Owner"),
    ("TPE1", "Artist"),
    ("TPE2", "Album Artist"),
    ("TPE3", "Conductor"),
    ("TPE4", "Remixer"),
    ("TPOS", "Disc Number"),
    ("TPRO", "Produced Notice"),
    ("TPUB", "Publisher"),
    ("TRCK", "Track Number"),
    ("TRDA", "Recording Dates"),
    ("TRSN", "Radio Station"),
    ("TRSO", "Radio Station Owner"),
    ("TSIZ", "Size"),
    ("TSO2", "Album Artist Sort Order"),
    ("TSOA", "Album Sort Order"),
    ("TSOC", "Composer Sort Order"),
    ("TSOP", "Performer Sort Order"),
    ("TSOT", "Title Sort Order"),
    ("TSRC", "ISRC"),
    ("TSSE", "Encoder Settings"),
    ("TSST", "Set Subtitle"),
    ("TXXX", "User Defined Text"),
    ("TYER", "Year"),
    ("UFID", "Unique File Identifier"),
    ("USER", "Terms of Use"),
    ("USLT", "Lyrics"),
    ("WCOM", "Commercial Information"),
    ("WCOP", "Copyright Information"),
    ("WOAF", "Official Audio File Webpage"),
    ("WOAR", "Official Artist Webpage"),
    ("WOAS", "Official Audio Source Webpage"),
    ("WORS", "Official Radio Webpage"),
    ("WPAY", "Payment"),
    ("WPUB", "Publisher Webpage"),
    ("WXXX", "User Defined URL"),
];
